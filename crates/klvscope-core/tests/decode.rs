use std::fs;

use klvscope_core::{
    DecodeOptions, FieldValue, analyze_bytes, analyze_klv_file, analyze_pcap_file,
    decode_local_set, parse_hex_string, parse_klv_packet,
};

mod support;

use support::{
    build_ipv4_udp_packet, klv_frame, klv_packet, record, sample_packet, temp_path, write_pcapng,
    write_pcapng_with_tsresol,
};

#[test]
fn decodes_reference_packet_fields() {
    let mut payload = record(2, &1_700_000_000_000_000u64.to_be_bytes());
    payload.extend(record(3, b"MISSION01 "));
    payload.extend(record(13, &0x5555_5555u32.to_be_bytes()));
    payload.extend(record(14, &0x8000_0000u32.to_be_bytes()));
    payload.extend(record(15, &0xffffu16.to_be_bytes()));
    let data = klv_packet(&payload);

    let packet = parse_klv_packet(&data).unwrap();
    assert_eq!(packet.total_len(), data.len());
    let fields = packet.decode();

    assert_eq!(
        fields.value_by_name("precision_time_stamp"),
        Some(&FieldValue::Unsigned(1_700_000_000_000_000))
    );
    assert_eq!(
        fields.value_by_name("mission_id").and_then(FieldValue::as_str),
        Some("MISSION01")
    );
    let latitude = fields
        .value_by_name("sensor_latitude")
        .and_then(FieldValue::as_f64)
        .unwrap();
    assert!((latitude - 60.0).abs() < 1e-6);
    assert!(
        fields
            .value_by_name("sensor_longitude")
            .is_some_and(FieldValue::is_missing)
    );
    let altitude = fields
        .value_by_name("sensor_true_altitude")
        .and_then(FieldValue::as_f64)
        .unwrap();
    assert!((altitude - 19000.0).abs() < 1e-6);
}

#[test]
fn hex_input_decodes_like_bytes() {
    let hex = "060e2b34 020b0101 0e010301 01000000 04 0502 8000";
    let data = parse_hex_string(hex).unwrap();
    let fields = parse_klv_packet(&data).unwrap().decode();
    let heading = fields.value(5).and_then(FieldValue::as_f64).unwrap();
    assert!((heading - 180.0).abs() < 0.01);
}

#[test]
fn local_set_without_framing_decodes() {
    let mut payload = record(65, &[17]);
    payload.extend(record(201, &[0xaa]));
    let fields = decode_local_set(&payload);
    assert_eq!(fields.value(65), Some(&FieldValue::Unsigned(17)));
    assert_eq!(fields.unknown_count(), 1);
}

#[test]
fn klv_file_resyncs_after_garbage() {
    let mut data = sample_packet(1_000_000, "A", 0);
    data.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    data.extend(sample_packet(2_000_000, "B", 0x4000));

    let path = temp_path("stream.klv");
    fs::write(&path, &data).unwrap();
    let report = analyze_klv_file(&path, &DecodeOptions::default()).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(report.input.bytes, data.len() as u64);
    assert_eq!(report.summary.klv_packets, 2);
    assert_eq!(report.summary.skipped_bytes, 4);
    assert_eq!(report.packets[1].index, 1);
    assert_eq!(
        report.packets[1].precision_time.as_deref(),
        Some("1970-01-01T00:00:02Z")
    );
    assert_eq!(
        report.packets[1]
            .fields
            .value_by_name("mission_id")
            .and_then(FieldValue::as_str),
        Some("B")
    );
}

#[test]
fn pcap_capture_decodes_udp_klv() {
    let frames = vec![
        (1_000_000, klv_frame(&sample_packet(10, "A", 0))),
        (
            2_000_000,
            build_ipv4_udp_packet([10, 0, 0, 3], [10, 0, 0, 4], 53, 53, b"not klv"),
        ),
        (3_000_000, klv_frame(&sample_packet(20, "B", 0))),
    ];
    let path = temp_path("capture.pcapng");
    write_pcapng(&path, &frames);
    let report = analyze_pcap_file(&path, &DecodeOptions::default()).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(report.summary.source_packets, Some(3));
    assert_eq!(report.summary.klv_packets, 2);
    assert_eq!(report.summary.skipped_bytes, 0);
    assert_eq!(report.generated_at, "1970-01-01T00:00:03Z");
    assert_eq!(report.summary.time_start.as_deref(), Some("1970-01-01T00:00:01Z"));

    let first = &report.packets[0];
    assert_eq!(first.source.as_deref(), Some("10.0.0.1:5000"));
    assert_eq!(first.destination.as_deref(), Some("10.0.0.2:15000"));
    assert_eq!(first.capture_time.as_deref(), Some("1970-01-01T00:00:01Z"));
}

#[test]
fn nanosecond_capture_times_are_not_scaled_as_micros() {
    let frames = vec![
        (1_000_000_000, klv_frame(&sample_packet(0, "A", 0))),
        (3_500_000_000, klv_frame(&sample_packet(0, "B", 0))),
    ];
    let path = temp_path("nanos_capture.pcapng");
    write_pcapng_with_tsresol(&path, Some(9), &frames);
    let report = analyze_pcap_file(&path, &DecodeOptions::default()).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(report.summary.time_start.as_deref(), Some("1970-01-01T00:00:01Z"));
    assert_eq!(report.summary.time_end.as_deref(), Some("1970-01-01T00:00:03.5Z"));
    assert_eq!(report.generated_at, "1970-01-01T00:00:03.5Z");
    assert_eq!(
        report.packets[1].capture_time.as_deref(),
        Some("1970-01-01T00:00:03.5Z")
    );
}

#[test]
fn nested_security_set_is_decoded_until_depth_limit() {
    let security = record(1, &[1]);
    let payload = record(48, &security);
    let data = klv_packet(&payload);

    let report = analyze_bytes("nested", &data, &DecodeOptions::default());
    let nested = report.packets[0]
        .fields
        .value(48)
        .and_then(FieldValue::as_set)
        .unwrap();
    assert_eq!(nested.len(), 1);

    let shallow = analyze_bytes("nested", &data, &DecodeOptions { max_depth: 0 });
    assert_eq!(
        shallow.packets[0].fields.value(48).and_then(FieldValue::as_bytes),
        Some(security.as_slice())
    );
}

#[test]
fn report_json_uses_field_names() {
    let data = sample_packet(0, "M", 0x8000);
    let report = analyze_bytes("memory", &data, &DecodeOptions::default());
    let value = serde_json::to_value(&report).unwrap();
    let fields = &value["packets"][0]["fields"];
    assert_eq!(fields["mission_id"], "M");
    assert_eq!(fields["uas_ls_version_number"], 17);
    assert_eq!(value["tool"]["name"], "klvscope");
}
