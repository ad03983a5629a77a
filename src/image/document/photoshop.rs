use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use image::RgbaImage;
use psd::{Psd, PsdGroup, PsdLayer};

use super::LayerInfo;
use crate::image::error::ProcessError;

/// Parse a PSD document.
///
/// The parser slices section data without bounds checks, so truncated input
/// panics instead of erroring. The panic is caught and reported as `Decode`.
pub(super) fn decode(path: &Path, bytes: &[u8]) -> Result<Psd, ProcessError> {
    match catch_unwind(AssertUnwindSafe(|| Psd::from_bytes(bytes))) {
        Ok(Ok(psd)) => Ok(psd),
        Ok(Err(err)) => Err(ProcessError::decode(path, err.to_string())),
        Err(_) => Err(ProcessError::decode(path, "malformed PSD (truncated section data)")),
    }
}

pub(super) fn layers(psd: &Psd) -> Vec<LayerInfo> {
    psd.layers()
        .iter()
        .map(|layer| LayerInfo {
            name: layer.name().to_string(),
            visible: is_shown(psd.groups(), layer),
            opacity: layer.opacity(),
        })
        .collect()
}

/// A layer is shown when it and every group above it are visible.
fn is_shown(groups: &HashMap<u32, PsdGroup>, layer: &PsdLayer) -> bool {
    if !layer.visible() {
        return false;
    }
    let mut parent = layer.parent_id();
    while let Some(id) = parent {
        match groups.get(&id) {
            Some(group) if group.visible() => parent = group.parent_id(),
            Some(_) => return false,
            None => break,
        }
    }
    true
}

/// Flatten all shown layers into one RGBA buffer.
///
/// Documents saved without layer records only carry the merged image, which
/// is used as-is.
pub(super) fn composite(path: &Path, psd: &Psd) -> Result<RgbaImage, ProcessError> {
    let rgba = if psd.layers().is_empty() {
        psd.rgba()
    } else {
        let groups = psd.groups();
        let flattened = catch_unwind(AssertUnwindSafe(|| {
            psd.flatten_layers_rgba(&|(_, layer): (usize, &PsdLayer)| is_shown(groups, layer))
        }));
        match flattened {
            Ok(Ok(rgba)) => rgba,
            Ok(Err(err)) => {
                return Err(ProcessError::decode(path, format!("compositing failed: {err}")));
            }
            Err(_) => {
                return Err(ProcessError::decode(path, "compositing failed: malformed layer data"));
            }
        }
    };

    into_rgba_image(path, psd.width(), psd.height(), rgba)
}

fn into_rgba_image(
    path: &Path,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
) -> Result<RgbaImage, ProcessError> {
    let len = rgba.len();
    RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        ProcessError::decode(
            path,
            format!("composite buffer of {len} bytes does not fit {width}x{height} RGBA"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::document::Document;
    use image::Rgba;

    // Layer record flag bit the parser reads as "visible".
    const FLAG_VISIBLE: u8 = 0x02;
    const DIVIDER_OPEN: i32 = 1;
    const DIVIDER_END: i32 = 3;

    /// One layer record of a 1x1 document.
    struct TestLayer {
        name: &'static str,
        pixel: Option<[u8; 4]>,
        visible: bool,
        divider: Option<i32>,
    }

    impl TestLayer {
        fn pixel(name: &'static str, pixel: [u8; 4], visible: bool) -> Self {
            Self {
                name,
                pixel: Some(pixel),
                visible,
                divider: None,
            }
        }

        fn divider(name: &'static str, kind: i32, visible: bool) -> Self {
            Self {
                name,
                pixel: None,
                visible,
                divider: Some(kind),
            }
        }

        fn record(&self) -> Vec<u8> {
            let mut out = Vec::new();
            let edge: i32 = if self.pixel.is_some() { 1 } else { 0 };
            for v in [0, 0, edge, edge] {
                out.extend(v.to_be_bytes());
            }

            let channels: &[i16] = if self.pixel.is_some() { &[0, 1, 2, -1] } else { &[] };
            out.extend((channels.len() as u16).to_be_bytes());
            for id in channels {
                out.extend(id.to_be_bytes());
                // compression marker + one raw byte
                out.extend(3u32.to_be_bytes());
            }

            out.extend(b"8BIMnorm");
            out.push(u8::MAX);
            out.push(0);
            out.push(if self.visible { FLAG_VISIBLE } else { 0 });
            out.push(0);

            let mut extra = Vec::new();
            extra.extend(0u32.to_be_bytes());
            extra.extend(0u32.to_be_bytes());
            extra.push(self.name.len() as u8);
            extra.extend(self.name.as_bytes());
            extra.resize(extra.len() + (4 - (self.name.len() + 1) % 4) % 4, 0);
            if let Some(kind) = self.divider {
                extra.extend(b"8BIMlsct");
                extra.extend(4u32.to_be_bytes());
                extra.extend(kind.to_be_bytes());
            }
            out.extend((extra.len() as u32).to_be_bytes());
            out.extend(extra);
            out
        }

        fn channel_data(&self) -> Vec<u8> {
            self.pixel
                .iter()
                .flat_map(|px| px.iter().flat_map(|&v| [0, 0, v]))
                .collect()
        }
    }

    fn section(body: Vec<u8>) -> Vec<u8> {
        let mut out = (body.len() as u32).to_be_bytes().to_vec();
        out.extend(body);
        out
    }

    /// Build a 1x1 RGB document. `layers` are listed bottom to top, as stored.
    fn psd_bytes(layers: &[TestLayer], merged: [u8; 3]) -> Vec<u8> {
        let mut out = header();
        out.extend(section(Vec::new())); // color mode data
        out.extend(section(Vec::new())); // image resources

        if layers.is_empty() {
            out.extend(section(Vec::new()));
        } else {
            let mut info = (layers.len() as i16).to_be_bytes().to_vec();
            for layer in layers {
                info.extend(layer.record());
            }
            for layer in layers {
                info.extend(layer.channel_data());
            }
            out.extend(section(section(info)));
        }

        out.extend(0u16.to_be_bytes()); // raw image data
        out.extend(merged);
        out
    }

    fn header() -> Vec<u8> {
        let mut out = b"8BPS".to_vec();
        out.extend(1u16.to_be_bytes());
        out.extend([0; 6]);
        out.extend(3u16.to_be_bytes()); // channels
        out.extend(1u32.to_be_bytes()); // height
        out.extend(1u32.to_be_bytes()); // width
        out.extend(8u16.to_be_bytes()); // depth
        out.extend(3u16.to_be_bytes()); // RGB
        out
    }

    fn open(bytes: &[u8]) -> Result<Psd, ProcessError> {
        decode(Path::new("art.psd"), bytes)
    }

    const PAPER: [u8; 4] = [255, 255, 255, 255];
    const INK: [u8; 4] = [0, 0, 0, 255];

    #[test]
    fn test_no_layer_records_uses_merged_image() {
        let psd = open(&psd_bytes(&[], [12, 34, 56])).unwrap();

        assert!(layers(&psd).is_empty());
        let img = composite(Path::new("art.psd"), &psd).unwrap();
        assert_eq!(img.dimensions(), (1, 1));
        assert_eq!(img.get_pixel(0, 0), &Rgba([12, 34, 56, 255]));
    }

    #[test]
    fn test_top_layer_wins_when_visible() {
        let bytes = psd_bytes(
            &[
                TestLayer::pixel("paper", PAPER, true),
                TestLayer::pixel("ink", INK, true),
            ],
            [255, 255, 255],
        );
        let psd = open(&bytes).unwrap();

        let names: Vec<_> = layers(&psd).into_iter().map(|l| l.name).collect();
        assert_eq!(names, ["ink", "paper"]);
        let img = composite(Path::new("art.psd"), &psd).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba(INK));
    }

    #[test]
    fn test_hidden_layer_is_skipped() {
        let bytes = psd_bytes(
            &[
                TestLayer::pixel("paper", PAPER, true),
                TestLayer::pixel("ink", INK, false),
            ],
            [0, 0, 0],
        );
        let psd = open(&bytes).unwrap();

        let info = layers(&psd);
        assert_eq!(
            info[0],
            LayerInfo {
                name: "ink".to_string(),
                visible: false,
                opacity: 255,
            }
        );
        assert!(info[1].visible);

        let img = composite(Path::new("art.psd"), &psd).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba(PAPER));
    }

    fn grouped(group_visible: bool) -> Vec<u8> {
        psd_bytes(
            &[
                TestLayer::pixel("paper", PAPER, true),
                TestLayer::divider("</Layer group>", DIVIDER_END, group_visible),
                TestLayer::pixel("ink", INK, true),
                TestLayer::divider("sketch", DIVIDER_OPEN, group_visible),
            ],
            [255, 255, 255],
        )
    }

    #[test]
    fn test_layer_under_hidden_group_is_skipped() {
        let psd = open(&grouped(false)).unwrap();

        let info = layers(&psd);
        let ink = info.iter().find(|l| l.name == "ink").unwrap();
        assert!(!ink.visible, "a hidden group hides its layers");

        let img = composite(Path::new("art.psd"), &psd).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba(PAPER));
    }

    #[test]
    fn test_layer_under_visible_group_is_drawn() {
        let psd = open(&grouped(true)).unwrap();

        assert!(layers(&psd).iter().all(|l| l.visible));
        let img = composite(Path::new("art.psd"), &psd).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba(INK));
    }

    #[test]
    fn test_truncated_sections_are_decode_errors() {
        // Valid header and three empty sections, but no image data.
        let mut bytes = header();
        for _ in 0..3 {
            bytes.extend(section(Vec::new()));
        }

        let err = open(&bytes).err().unwrap();
        assert!(matches!(err, ProcessError::Decode { .. }));
        assert_eq!(err.exit_code(), 3);

        let err = Document::from_bytes(Path::new("h.psd"), &bytes).err().unwrap();
        assert!(matches!(err, ProcessError::Decode { ref path, .. } if path == Path::new("h.psd")));
    }

    #[test]
    fn test_bad_header_is_decode_error() {
        let err = open(b"8BPS\x00\x01").err().unwrap();
        assert!(matches!(err, ProcessError::Decode { .. }));
    }

    #[test]
    fn test_wrong_buffer_length_is_decode_error() {
        let err = into_rgba_image(Path::new("art.psd"), 2, 2, vec![0; 12]).unwrap_err();
        match err {
            ProcessError::Decode { reason, .. } => assert!(reason.contains("12 bytes")),
            other => panic!("expected Decode, got {other:?}"),
        }

        let img = into_rgba_image(Path::new("art.psd"), 2, 2, vec![7; 16]).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
    }

    #[test]
    fn test_document_open_psd() {
        let bytes = psd_bytes(&[TestLayer::pixel("ink", INK, true)], [0, 0, 0]);
        let doc = Document::from_bytes(Path::new("art.psd"), &bytes).unwrap();

        assert_eq!(doc.kind(), "psd");
        assert_eq!(doc.dimensions(), (1, 1));
        assert_eq!(doc.layers().len(), 1);
        assert_eq!(doc.composite().unwrap().get_pixel(0, 0), &Rgba(INK));
    }
}
