//! End-to-end preview output: render, encode, write, decode.

#![allow(clippy::unwrap_used)]

use mesh_preview::{render_png, PreviewOptions};
use mesh_types::{cuboid, TriangleSource};
use tempfile::tempdir;

#[test]
fn written_png_decodes_with_transparency() {
    let soup = cuboid(30.0, 20.0, 10.0).to_soup().unwrap();
    let png = render_png(&soup, &PreviewOptions::default().with_size(96, 64)).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("part.png");
    std::fs::write(&path, &png).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (96, 64));
    assert_eq!(decoded.get_pixel(0, 0)[3], 0);
    assert_eq!(decoded.get_pixel(48, 32)[3], 255);

    let [r, g, b, _] = decoded.get_pixel(48, 32).0;
    // Lit model color keeps blue dominant
    assert!(b >= r && b >= g);
}

#[test]
fn custom_color_is_used() {
    let soup = cuboid(10.0, 10.0, 10.0).to_soup().unwrap();
    let opts = PreviewOptions::thumbnail()
        .with_color([255, 0, 0])
        .with_lighting(1.0, 0.0);
    let png = render_png(&soup, &opts).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(64, 64).0, [255, 0, 0, 255]);
}
