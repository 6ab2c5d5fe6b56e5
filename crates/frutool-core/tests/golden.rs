use std::fs;
use std::path::{Path, PathBuf};

use frutool_core::{
    AreaKind, DELL_MANUFACTURER_ID, FieldEncoding, Record, decode, encode_with, parse_config,
    render_config,
};

fn case_dir(case: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tests")
        .join("golden")
        .join(case)
}

fn load_expected_image(case: &str) -> Vec<u8> {
    fs::read(case_dir(case).join("expected.bin")).expect("read expected.bin")
}

fn load_config_record(case: &str) -> (Record, Vec<u8>) {
    let text = fs::read_to_string(case_dir(case).join("input.toml")).expect("read input.toml");
    let config = parse_config(&text).expect("parse input.toml");
    let image = encode_with(&config.record, &config.encode_options()).expect("encode record");
    (config.record, image)
}

fn run_golden(case: &str) {
    let expected = load_expected_image(case);
    let (record, actual) = load_config_record(case);

    assert_eq!(actual, expected, "golden mismatch in {case}");
    assert_eq!(
        decode(&expected).expect("decode expected"),
        record,
        "decoded record mismatch in {case}"
    );
}

#[test]
fn golden_all() {
    run_golden("all");
}

#[test]
fn golden_chassis() {
    run_golden("chassis");
}

#[test]
fn golden_board() {
    run_golden("board");
}

#[test]
fn golden_product() {
    run_golden("product");
}

#[test]
fn golden_empty() {
    run_golden("empty");
}

#[test]
fn golden_multirecord() {
    run_golden("multirecord");
}

#[test]
fn golden_typed() {
    run_golden("typed");
}

#[test]
fn golden_all_has_areas_in_order() {
    let image = load_expected_image("all");
    assert_eq!(image.len(), 256);
    assert_eq!(image[1], 0, "internal use area is never written");
    assert_eq!(image[2], 1, "chassis follows the header");
    assert!(image[2] < image[3] && image[3] < image[4]);
    assert_eq!(image[5], 0);
}

#[test]
fn golden_empty_is_header_and_padding() {
    let image = load_expected_image("empty");
    assert_eq!(image.len(), 32);
    assert_eq!(&image[..8], [0x01, 0, 0, 0, 0, 0, 0, 0xFF]);
    assert!(image[8..].iter().all(|b| *b == 0));
}

#[test]
fn golden_multirecord_has_one_end_of_list_flag() {
    let record = decode(&load_expected_image("multirecord")).expect("decode");
    let records = &record.multirecord.as_ref().expect("multirecord").records;
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].manufacturer_id(), Some(DELL_MANUFACTURER_ID));
    assert_eq!(records[1].payload[3..], *b"service");
    assert!(records[2].payload.is_empty());

    let image = load_expected_image("multirecord");
    let start = image[5] as usize * 8;
    let mut cursor = start;
    let mut flags = Vec::new();
    for _ in 0..records.len() {
        flags.push(image[cursor + 1] & 0x80 != 0);
        cursor += 5 + image[cursor + 2] as usize;
    }
    assert_eq!(flags, [false, false, true]);
}

#[test]
fn golden_typed_keeps_encodings() {
    let record = decode(&load_expected_image("typed")).expect("decode");
    let board = record.board.as_ref().expect("board");
    assert_eq!(board.language_code, 25);
    let serial = board.serial_number.as_ref().expect("serial");
    assert_eq!(serial.encoding, FieldEncoding::BcdPlus);
    assert_eq!(serial.value, "0123 4567-.9");
    let part = board.part_number.as_ref().expect("part");
    assert_eq!(part.encoding, FieldEncoding::Binary);
    assert_eq!(part.value, "deadbeef");
    assert_eq!(board.custom_fields[1].value, "Café");
}

#[test]
fn golden_images_survive_dump_and_regenerate() {
    for case in ["all", "chassis", "board", "product", "empty", "multirecord", "typed"] {
        let image = load_expected_image(case);
        let record = decode(&image).expect("decode");
        assert!(record.warnings().is_empty(), "unexpected warnings in {case}");

        let text = render_config(&record, Some(image.len())).expect("render");
        let config = parse_config(&text).expect("parse rendered config");
        let regenerated = encode_with(&config.record, &config.encode_options()).expect("encode");
        assert_eq!(regenerated, image, "dump/generate mismatch in {case}");
    }
}

#[test]
fn golden_checksum_corruption_is_a_warning() {
    let mut image = load_expected_image("all");
    let product = image[4] as usize * 8;
    let length = image[product + 1] as usize * 8;
    image[product + length - 1] ^= 0x5A;

    let record = decode(&image).expect("decode");
    let warnings = record.warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].0, AreaKind::Product);
}
