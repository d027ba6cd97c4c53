use approx::assert_abs_diff_eq;
use dataset2yolo::{BoundingBox, ConvertError, Normalization};

const CORNERS: &[(f64, f64, f64, f64)] = &[
    (0.0, 0.0, 0.0, 0.0),
    (10.0, 50.0, 20.0, 60.0),
    (0.5, 1.25, 3.75, 9.5),
    (-12.0, 4.0, -3.5, 0.0),
    (640.0, 1280.0, 360.0, 720.0),
    (1.0 / 3.0, 2.0 / 3.0, 0.1, 0.7),
];

fn sample_boxes() -> Vec<BoundingBox<u32>> {
    CORNERS
        .iter()
        .enumerate()
        .map(|(i, &(xmin, xmax, ymin, ymax))| {
            BoundingBox::new(xmin, xmax, ymin, ymax, i as u32).unwrap()
        })
        .collect()
}

#[test]
fn test_construction_stores_exact_values() {
    for &(xmin, xmax, ymin, ymax) in CORNERS {
        let bbox = BoundingBox::new(xmin, xmax, ymin, ymax, "label").unwrap();
        assert_eq!(bbox.xmin(), xmin);
        assert_eq!(bbox.xmax(), xmax);
        assert_eq!(bbox.ymin(), ymin);
        assert_eq!(bbox.ymax(), ymax);
        assert_eq!(*bbox.label(), "label");
    }
}

#[test]
fn test_construction_accepts_integers() {
    let bbox = BoundingBox::new(10_i32, 50, 20, 60, 3_usize).unwrap();
    assert_eq!(bbox.to_corners(None), [10.0, 20.0, 50.0, 60.0]);

    let bbox = BoundingBox::new(10_u32, 50, 20, 60, 3_usize).unwrap();
    assert_eq!(bbox.dimensions(), (40.0, 40.0));

    let bbox = BoundingBox::new(10.5_f32, 50.5, 20.25, 60.25, 3_usize).unwrap();
    assert_eq!(bbox.dimensions(), (40.0, 40.0));
}

#[test]
fn test_construction_accepts_mixed_numeric_types() {
    let bbox = BoundingBox::new(10_i64, 50_u64, 20_usize, 60.5_f64, 0_u32).unwrap();
    assert_eq!(bbox.to_corners(None), [10.0, 20.0, 50.0, 60.5]);

    let bbox = BoundingBox::new(0_u8, 2.5_f32, -4_i16, 4_isize, 0_u32).unwrap();
    assert_eq!(bbox.dimensions(), (2.5, 8.0));

    assert!(matches!(
        BoundingBox::new(50_usize, 10_i64, 0.0, 1.0, 0_u32),
        Err(ConvertError::InvalidGeometry { .. })
    ));
}

#[test]
fn test_construction_rejects_inverted_boxes() {
    let inverted = [
        (10.0, 5.0, 0.0, 1.0),
        (0.0, 1.0, 10.0, 5.0),
        (10.0, 5.0, 10.0, 5.0),
        (0.0, -0.000001, 0.0, 0.0),
    ];
    for (xmin, xmax, ymin, ymax) in inverted {
        let result = BoundingBox::new(xmin, xmax, ymin, ymax, 0_u32);
        assert!(
            matches!(result, Err(ConvertError::InvalidGeometry { .. })),
            "expected InvalidGeometry for {:?}",
            (xmin, xmax, ymin, ymax)
        );
    }
}

#[test]
fn test_construction_rejects_nan() {
    let result = BoundingBox::new(f64::NAN, 1.0, 0.0, 1.0, 0_u32);
    assert!(matches!(result, Err(ConvertError::InvalidGeometry { .. })));

    let result = BoundingBox::new(0.0, 1.0, 0.0, f64::NAN, 0_u32);
    assert!(matches!(result, Err(ConvertError::InvalidGeometry { .. })));
}

#[test]
fn test_dimensions_and_area() {
    for bbox in sample_boxes() {
        let (width, height) = bbox.dimensions();
        assert_eq!(width, bbox.xmax() - bbox.xmin());
        assert_eq!(height, bbox.ymax() - bbox.ymin());
        assert!(width >= 0.0 && height >= 0.0);
        assert_eq!(bbox.area(), width * height);
    }
}

#[test]
fn test_degenerate_boxes_have_zero_area() {
    let point = BoundingBox::new(5, 5, 5, 5, "x").unwrap();
    assert_eq!(point.area(), 0.0);

    let line = BoundingBox::new(0.0, 10.0, 3.0, 3.0, "x").unwrap();
    assert_eq!(line.dimensions(), (10.0, 0.0));
    assert_eq!(line.area(), 0.0);
}

#[test]
fn test_corners_round_trip() {
    for &(xmin, xmax, ymin, ymax) in CORNERS {
        let bbox = BoundingBox::new(xmin, xmax, ymin, ymax, ()).unwrap();
        assert_eq!(bbox.to_corners(None), [xmin, ymin, xmax, ymax]);
    }
}

#[test]
fn test_top_left_and_center_consistency() {
    for bbox in sample_boxes() {
        let corners = bbox.to_corners(None);
        let top_left = bbox.to_top_left_size(None);
        let center = bbox.to_center_size(None);

        assert_eq!(top_left[0], corners[0]);
        assert_eq!(top_left[1], corners[1]);
        assert_eq!(center[0], top_left[0] + top_left[2] / 2.0);
        assert_eq!(center[1], top_left[1] + top_left[3] / 2.0);
        assert_eq!(center[2], top_left[2]);
        assert_eq!(center[3], top_left[3]);
    }
}

#[test]
fn test_normalization_is_componentwise_division() {
    let sizes = [(100.0, 100.0), (1920.0, 1080.0), (0.5, 3.0), (7.0, 13.0)];
    for bbox in sample_boxes() {
        for (width, height) in sizes {
            let normalization = Normalization::new(width, height).unwrap();
            let conversions = [
                (bbox.to_corners(None), bbox.to_corners(Some(normalization))),
                (
                    bbox.to_top_left_size(None),
                    bbox.to_top_left_size(Some(normalization)),
                ),
                (
                    bbox.to_center_size(None),
                    bbox.to_center_size(Some(normalization)),
                ),
            ];
            for (raw, normalized) in conversions {
                assert_eq!(normalized[0], raw[0] / width);
                assert_eq!(normalized[1], raw[1] / height);
                assert_eq!(normalized[2], raw[2] / width);
                assert_eq!(normalized[3], raw[3] / height);
            }
        }
    }
}

#[test]
fn test_normalization_does_not_clamp() {
    let bbox = BoundingBox::new(-50.0, 150.0, 80.0, 250.0, 0_u32).unwrap();
    let normalization = Normalization::new(100.0, 200.0).unwrap();
    assert_eq!(
        bbox.to_corners(Some(normalization)),
        [-0.5, 0.4, 1.5, 1.25]
    );
}

#[test]
fn test_conversions_are_idempotent() {
    let normalization = Normalization::from_image_size(640, 480).unwrap();
    for bbox in sample_boxes() {
        let before = bbox.clone();
        for _ in 0..3 {
            assert_eq!(bbox.to_corners(None), before.to_corners(None));
            assert_eq!(
                bbox.to_top_left_size(Some(normalization)),
                before.to_top_left_size(Some(normalization))
            );
            assert_eq!(
                bbox.to_center_size(Some(normalization)),
                before.to_center_size(Some(normalization))
            );
        }
        assert_eq!(bbox, before);
    }
}

#[test]
fn test_normalization_rejects_non_positive_sizes() {
    for (width, height) in [
        (0.0, 100.0),
        (100.0, 0.0),
        (-1.0, 100.0),
        (f64::NAN, 1.0),
        (f64::INFINITY, 1.0),
    ] {
        assert!(matches!(
            Normalization::new(width, height),
            Err(ConvertError::InvalidNormalization { .. })
        ));
    }
    assert!(Normalization::from_image_size(0, 480).is_err());

    let normalization = Normalization::from_image_size(640, 480).unwrap();
    assert_eq!(normalization.width(), 640.0);
    assert_eq!(normalization.height(), 480.0);
}

#[test]
fn test_reference_box() {
    let bbox = BoundingBox::new(10, 50, 20, 60, 3_u32).unwrap();

    assert_eq!(bbox.dimensions(), (40.0, 40.0));
    assert_eq!(bbox.area(), 1600.0);
    assert_eq!(bbox.to_corners(None), [10.0, 20.0, 50.0, 60.0]);
    assert_eq!(bbox.to_top_left_size(None), [10.0, 20.0, 40.0, 40.0]);
    assert_eq!(bbox.to_center_size(None), [30.0, 40.0, 40.0, 40.0]);

    let normalization = Normalization::new(100.0, 100.0).unwrap();
    let [cx, cy, w, h] = bbox.to_center_size(Some(normalization));
    assert_abs_diff_eq!(cx, 0.3);
    assert_abs_diff_eq!(cy, 0.4);
    assert_abs_diff_eq!(w, 0.4);
    assert_abs_diff_eq!(h, 0.4);
}

#[test]
fn test_point_box_is_valid() {
    let bbox = BoundingBox::new(5, 5, 5, 5, "x".to_string()).unwrap();
    assert_eq!(bbox.area(), 0.0);
    assert_eq!(bbox.label(), "x");
}

#[test]
fn test_inverted_x_fails() {
    let result = BoundingBox::new(10, 5, 0, 1, "x".to_string());
    match result {
        Err(ConvertError::InvalidGeometry { xmin, xmax, .. }) => {
            assert_eq!(xmin, 10.0);
            assert_eq!(xmax, 5.0);
        }
        other => panic!("expected InvalidGeometry, got {:?}", other),
    }
}
