#![allow(dead_code)]

use clap::Parser;
use dataset2yolo::Args;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Solid grey image of the given size; the format follows the extension.
pub fn write_image(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbImage::from_pixel(width, height, image::Rgb([128, 128, 128]))
        .save(path)
        .unwrap();
}

pub fn parse_args(extra: &[&str]) -> Args {
    let mut argv = vec!["dataset2yolo"];
    argv.extend_from_slice(extra);
    Args::parse_from(argv)
}

pub fn bdd_label(objects: &str) -> String {
    format!(
        r#"{{"name": "frame", "frames": [{{"timestamp": 10000, "objects": [{}]}}]}}"#,
        objects
    )
}

/// BDD100K tree with two splits:
/// - train: `a.jpg` (car + dog + lane), `c.jpg` without label
/// - val: `b.png` (person), `e.png` (lane only)
pub fn build_bdd_dataset(root: &Path) {
    let images = root.join("images/100k");
    let labels = root.join("labels/100k");

    write_image(&images.join("train/a.jpg"), 200, 100);
    write_file(
        &labels.join("train/a.json"),
        &bdd_label(
            r#"{"category": "car", "id": 0, "box2d": {"x1": 20, "y1": 10, "x2": 60, "y2": 50}},
               {"category": "dog", "id": 1, "box2d": {"x1": 0, "y1": 0, "x2": 5, "y2": 5}},
               {"category": "lane/single white", "id": 2, "poly2d": [[0, 0, "L"], [5, 5, "L"]]}"#,
        ),
    );
    write_image(&images.join("train/c.jpg"), 200, 100);

    write_image(&images.join("val/b.png"), 100, 50);
    write_file(
        &labels.join("val/b.json"),
        &bdd_label(r#"{"category": "person", "box2d": {"x1": 10.0, "y1": 5.0, "x2": 30.0, "y2": 45.0}}"#),
    );
    write_image(&images.join("val/e.png"), 100, 50);
    write_file(
        &labels.join("val/e.json"),
        &bdd_label(r#"{"category": "drivable area", "poly2d": []}"#),
    );
}

/// InOutDoorPeopleRGBD tree:
/// - train: `seq0_0001` (one person, YAML), `seq0_0002` (no image), `seq2_0001` (no objects)
/// - test: `seq3_0001` (two people, XML)
pub fn build_inoutdoor_dataset(root: &Path) {
    for dir in ["Annotations", "ImageSets", "ImagesQhd", "DepthJetQhd"] {
        fs::create_dir_all(root.join(dir)).unwrap();
    }

    write_file(&root.join("ImageSets/seq0.txt"), "seq0_0001\nseq0_0002\n\n");
    write_file(&root.join("ImageSets/seq1.txt"), "");
    write_file(&root.join("ImageSets/seq2.txt"), "seq2_0001\n");
    write_file(&root.join("ImageSets/seq3.txt"), "seq3_0001\n");

    write_image(&root.join("ImagesQhd/seq0_0001.png"), 96, 54);
    write_file(
        &root.join("Annotations/seq0_0001.yml"),
        "annotation:\n  filename: seq0_0001\n  size:\n    width: '96'\n    height: 54\n  object:\n    name: person\n    bndbox:\n      xmin: '24'\n      ymin: 27\n      xmax: 48\n      ymax: '54'\n",
    );
    write_file(
        &root.join("Annotations/seq0_0002.yml"),
        "annotation:\n  size:\n    width: 96\n    height: 54\n",
    );

    write_image(&root.join("ImagesQhd/seq2_0001.png"), 96, 54);
    write_file(
        &root.join("Annotations/seq2_0001.yml"),
        "annotation:\n  size:\n    width: 96\n    height: 54\n",
    );

    write_image(&root.join("ImagesQhd/seq3_0001.png"), 96, 54);
    write_file(
        &root.join("Annotations/seq3_0001.xml"),
        "<annotation>\n  <filename>seq3_0001.png</filename>\n  <size><width>96</width><height>54</height><depth>3</depth></size>\n  <object><name>person</name><bndbox><xmin>0</xmin><ymin>0</ymin><xmax>48</xmax><ymax>27</ymax></bndbox></object>\n  <object><name>person</name><bndbox><xmin>48</xmin><ymin>27</ymin><xmax>96</xmax><ymax>54</ymax></bndbox></object>\n</annotation>\n",
    );
}
