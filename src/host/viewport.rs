use crate::foundation::core::DisplaySize;
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::surface::DeviceProfile;

/// Viewport size used when the host cannot deliver resize notifications.
pub const FALLBACK_VIEWPORT: DisplaySize = DisplaySize {
    width: 1024.0,
    height: 768.0,
};

/// Token for one registered resize listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a host-specific listener id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// The host environment a layer is mounted into.
pub trait HostViewport {
    /// Current viewport size, logical px.
    fn size(&self) -> DisplaySize;

    /// Device capability hints.
    fn device(&self) -> DeviceProfile;

    /// Register interest in viewport size changes.
    fn add_resize_listener(&mut self) -> OverlayResult<ListenerId>;

    /// Deregister a listener. Unknown ids are ignored.
    fn remove_resize_listener(&mut self, id: ListenerId);
}

/// In-memory viewport for headless hosts and tests.
#[derive(Debug)]
pub struct SimulatedViewport {
    size: DisplaySize,
    device: DeviceProfile,
    supports_resize: bool,
    next_id: u64,
    listeners: Vec<ListenerId>,
}

impl SimulatedViewport {
    /// A viewport that delivers resize notifications.
    pub fn new(size: DisplaySize, device: DeviceProfile) -> Self {
        Self {
            size,
            device,
            supports_resize: true,
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// A viewport without resize semantics; listener registration fails.
    pub fn without_resize_events(size: DisplaySize, device: DeviceProfile) -> Self {
        Self {
            supports_resize: false,
            ..Self::new(size, device)
        }
    }

    /// Change the size and return the listeners that must be notified.
    pub fn resize(&mut self, size: DisplaySize) -> Vec<ListenerId> {
        self.size = size;
        self.listeners.clone()
    }

    /// Change the device profile (a window moved to another display) and return the listeners
    /// that must be notified.
    pub fn set_device(&mut self, device: DeviceProfile) -> Vec<ListenerId> {
        self.device = device;
        self.listeners.clone()
    }

    /// Currently registered listeners.
    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }
}

impl HostViewport for SimulatedViewport {
    fn size(&self) -> DisplaySize {
        self.size
    }

    fn device(&self) -> DeviceProfile {
        self.device
    }

    fn add_resize_listener(&mut self) -> OverlayResult<ListenerId> {
        if !self.supports_resize {
            return Err(OverlayError::host("viewport has no resize notifications"));
        }
        self.next_id = self.next_id.wrapping_add(1);
        let id = ListenerId(self.next_id);
        self.listeners.push(id);
        Ok(id)
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|&l| l != id);
    }
}
