use super::*;

fn desktop(ratio: f64) -> DeviceProfile {
    DeviceProfile {
        pixel_ratio: ratio,
        mobile: false,
    }
}

#[test]
fn configure_never_produces_zero_sized_buffers() {
    for (w, h) in [(0.0, 0.0), (0.0, 10.0), (10.0, 0.0), (0.2, 0.2), (-5.0, f64::NAN)] {
        let s = configure(DisplaySize::new(w, h), desktop(1.0), None);
        assert!(s.pixel_size().width >= 1);
        assert!(s.pixel_size().height >= 1);
        assert_eq!(s.data().len(), s.pixel_size().rgba_len());
    }
}

#[test]
fn configure_scales_by_capped_pixel_ratio() {
    let s = configure(DisplaySize::new(100.0, 50.0), desktop(3.0), None);
    assert_eq!(s.scale(), 2.0);
    assert_eq!(s.pixel_size(), PixelSize::at_least_one(200, 100));
    assert_eq!(s.display_size(), DisplaySize::new(100.0, 50.0));

    let s = configure(
        DisplaySize::new(100.0, 50.0),
        desktop(3.0),
        Some(ResolutionCap::new(1.0).unwrap()),
    );
    assert_eq!(s.pixel_size(), PixelSize::at_least_one(100, 50));
}

#[test]
fn mobile_devices_get_a_lower_default_cap() {
    let phone = DeviceProfile::from_user_agent(
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148",
        3.0,
    );
    assert!(phone.mobile);
    let s = configure(DisplaySize::new(10.0, 10.0), phone, None);
    assert_eq!(s.scale(), ResolutionCap::MOBILE.get());
    assert_eq!(s.pixel_size(), PixelSize::at_least_one(15, 15));
}

#[test]
fn user_agent_detection_is_case_insensitive() {
    assert!(is_mobile_user_agent("Linux; ANDROID 14"));
    assert!(is_mobile_user_agent("ipad os"));
    assert!(!is_mobile_user_agent("Mozilla/5.0 (X11; Linux x86_64) Firefox/130.0"));
}

#[test]
fn bogus_pixel_ratio_falls_back_to_one() {
    let s = configure(DisplaySize::new(8.0, 8.0), desktop(f64::NAN), None);
    assert_eq!(s.scale(), 1.0);
    let s = configure(DisplaySize::new(8.0, 8.0), desktop(-2.0), None);
    assert_eq!(s.scale(), 1.0);
}

#[test]
fn resize_reallocates_and_bumps_generation() {
    let mut s = configure(DisplaySize::new(800.0, 600.0), desktop(1.0), None);
    let g0 = s.generation();
    assert!(s.resize(DisplaySize::new(400.0, 300.0), desktop(1.0)));
    assert_eq!(s.pixel_size(), PixelSize::at_least_one(400, 300));
    assert!(s.generation() > g0);

    let g1 = s.generation();
    assert!(!s.resize(DisplaySize::new(400.0, 300.0), desktop(1.0)));
    assert_eq!(s.generation(), g1);
}

#[test]
fn resize_picks_up_a_new_pixel_ratio() {
    let mut s = configure(DisplaySize::new(400.0, 300.0), desktop(1.0), None);
    let g0 = s.generation();

    assert!(s.resize(DisplaySize::new(400.0, 300.0), desktop(2.0)));
    assert_eq!(s.scale(), 2.0);
    assert_eq!(s.pixel_size(), PixelSize::at_least_one(800, 600));
    assert_eq!(s.display_size(), DisplaySize::new(400.0, 300.0));
    assert!(s.generation() > g0);

    // Default cap follows the device class.
    let phone = DeviceProfile {
        pixel_ratio: 2.0,
        mobile: true,
    };
    assert!(s.resize(DisplaySize::new(400.0, 300.0), phone));
    assert_eq!(s.resolution_cap(), ResolutionCap::MOBILE);
    assert_eq!(s.pixel_size(), PixelSize::at_least_one(600, 450));
}

#[test]
fn explicit_cap_survives_device_changes() {
    let cap = ResolutionCap::new(1.25).unwrap();
    let mut s = configure(DisplaySize::new(100.0, 100.0), desktop(1.0), Some(cap));
    s.resize(DisplaySize::new(100.0, 100.0), desktop(3.0));
    assert_eq!(s.resolution_cap(), cap);
    assert_eq!(s.scale(), 1.25);
}

#[test]
fn resize_to_collapsed_container_is_harmless() {
    let mut s = configure(DisplaySize::new(64.0, 64.0), desktop(1.0), None);
    s.resize(DisplaySize::new(0.0, 0.0), desktop(1.0));
    assert_eq!(s.pixel_size(), PixelSize::at_least_one(1, 1));
    s.clear();
    assert_eq!(s.data(), &[0, 0, 0, 0]);
}

#[test]
fn logical_rects_map_through_scale() {
    let s = configure(DisplaySize::new(100.0, 100.0), desktop(2.0), None);
    let r = s.logical_to_device(Rect::new(10.0, 5.0, 20.0, 15.0));
    assert_eq!(r, Rect::new(20.0, 10.0, 40.0, 30.0));
}

#[test]
fn composite_op_is_restored_after_scope() {
    let mut s = configure(DisplaySize::new(4.0, 4.0), desktop(1.0), None);
    let seen = s.with_composite_op(CompositeOp::DestinationIn, |s| s.composite_op());
    assert_eq!(seen, CompositeOp::DestinationIn);
    assert_eq!(s.composite_op(), CompositeOp::SourceOver);
}

#[test]
fn draw_image_upscales_nearest_neighbor() {
    let mut s = configure(DisplaySize::new(4.0, 2.0), desktop(1.0), None);
    let src = [10u8, 10, 10, 255, 200, 200, 200, 255];
    s.draw_image(&src, PixelSize::at_least_one(2, 1), Rect::new(0.0, 0.0, 4.0, 2.0))
        .unwrap();
    let reds: Vec<u8> = s.data().chunks_exact(4).map(|px| px[0]).collect();
    assert_eq!(reds, vec![10, 10, 200, 200, 10, 10, 200, 200]);
}

#[test]
fn destination_in_clears_outside_drawn_region() {
    let mut s = configure(DisplaySize::new(3.0, 1.0), desktop(1.0), None);
    s.data_mut().fill(255);
    s.with_composite_op(CompositeOp::DestinationIn, |s| {
        s.draw_coverage(&[128], PixelSize::at_least_one(1, 1), (1, 0))
    })
    .unwrap();
    let alphas: Vec<u8> = s.data().chunks_exact(4).map(|px| px[3]).collect();
    assert_eq!(alphas, vec![0, 128, 0]);
}

#[test]
fn source_over_coverage_paints_black() {
    let mut s = configure(DisplaySize::new(1.0, 1.0), desktop(1.0), None);
    s.draw_coverage(&[255], PixelSize::at_least_one(1, 1), (0, 0))
        .unwrap();
    assert_eq!(s.data(), &[0, 0, 0, 255]);
}

#[test]
fn resolution_cap_rejects_nonsense() {
    assert!(ResolutionCap::new(0.0).is_err());
    assert!(ResolutionCap::new(f64::INFINITY).is_err());
    assert!(ResolutionCap::new(1.25).is_ok());
}
