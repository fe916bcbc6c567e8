use super::*;

#[test]
fn buffer_length_is_checked() {
    let err = FrameRGBA::from_premul(2, 2, vec![0; 15]).unwrap_err();
    assert!(matches!(err, ThumbError::Render(_)));
    assert!(FrameRGBA::from_premul(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn straight_input_is_premultiplied() {
    let f = FrameRGBA::from_straight(1, 1, vec![255, 128, 0, 128]).unwrap();
    assert_eq!(f.pixel(0, 0), Some([128, 64, 0, 128]));
    assert_eq!(f.pixel(1, 0), None);

    let f = FrameRGBA::from_straight(1, 1, vec![200, 200, 200, 0]).unwrap();
    assert_eq!(f.data, vec![0, 0, 0, 0]);
}

#[test]
fn unpremultiply_restores_opaque_and_approximates_partial() {
    let f = FrameRGBA::from_premul(2, 1, vec![10, 20, 30, 255, 64, 32, 0, 128]).unwrap();
    let s = f.to_straight_rgba8();
    assert_eq!(&s[..4], &[10, 20, 30, 255]);
    assert_eq!(&s[4..], &[128, 64, 0, 128]);
}

#[test]
fn png_round_trips_through_decoder() {
    let canvas = Canvas {
        width: 3,
        height: 2,
    };
    let mut f = FrameRGBA::transparent(canvas);
    f.data[..4].copy_from_slice(&[255, 0, 0, 255]);

    let png = encode_png(&f).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

    let back = decode_image(&png).unwrap();
    assert_eq!((back.width, back.height), (3, 2));
    assert_eq!(back.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(back.pixel(2, 1), Some([0, 0, 0, 0]));
}

#[test]
fn garbage_bytes_are_a_resource_error() {
    let err = decode_image(b"not an image").unwrap_err();
    assert!(matches!(err, ThumbError::Resource(_)));
}
