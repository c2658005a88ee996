//! End-to-end decompilation through the pipeline API.

use c8d::{EmitConfig, Error, Indent, Pipeline, Quirks, Report, decompile};

fn octo(rom: &[u8]) -> String {
    decompile(rom, Quirks::default()).unwrap()
}

#[test]
fn loop_recovery() {
    let text = octo(&[0x00, 0xE0, 0x12, 0x00]);
    assert!(text.contains(": main\n\tloop\n\t\tclear\n\tagain\n"));
    assert!(!text.contains("jump"));
}

#[test]
fn nested_loops_close_innermost_first() {
    // 0x200: clear   0x202: v0 += 1   0x204: if v0 == 0 then   0x206: jump 0x202
    // 0x208: jump 0x200
    let rom = [0x00, 0xE0, 0x70, 0x01, 0x40, 0x00, 0x12, 0x02, 0x12, 0x00];
    let text = octo(&rom);
    let expected = "\n: main\n\tloop\n\t\tclear\n\t\tloop\n\t\t\tv0 += 1\n\t\t\tif v0 == 0 then\n\t\tagain\n\tagain\n\n";
    assert_eq!(text, expected);
}

#[test]
fn jump_back_past_the_head_keeps_its_label() {
    // 0x200: clear   0x202: if v0 key then   0x204: jump 0x200   0x206: jump 0x202
    let rom = [0x00, 0xE0, 0xE0, 0xA1, 0x12, 0x00, 0x12, 0x02];
    let text = octo(&rom);
    let expected = "\n: main\n\tloop\n\t\tclear\n: label-0\n\t\tif v0 key then\n\tagain\n\tjump label-0\n\n";
    assert_eq!(text, expected);
}

#[test]
fn self_modifying_code_renders_both_views() {
    // i := 0x200; save v0; exit
    let text = octo(&[0xA2, 0x00, 0xF0, 0x55, 0x00, 0xFD]);
    assert!(text.contains("0xA2 0x00 # smc? i := main\n"));
    assert!(text.contains("\tsave v0\n\texit\n"));
}

#[test]
fn out_of_range_targets_become_constants() {
    // native 0x120; call 0x400
    let text = octo(&[0x01, 0x20, 0x24, 0x00]);
    assert!(text.contains(":const sub-0 0x400\n"));
    assert!(text.contains(":const machine-0 0x120\n"));
    assert!(text.contains("\tsub-0\n"));
    assert!(text.contains("\tnative machine-0\n"));
}

#[test]
fn native_region_is_disassembled() {
    // native 0x206; exit; (pad); 0x206: ldi 0x20; plo r6; sep r4; 0x20A: 0x77
    let rom = [0x02, 0x06, 0x00, 0xFD, 0x00, 0x00, 0xF8, 0x20, 0xA6, 0xD4, 0x77];
    let text = octo(&rom);
    let expected = ": machine-0\n\t0xF8 0x20 # ldi 0x20\n\t0xA6 # plo r6\n\t0xD4 # sep r4\n\n\t0x77 # unused?\n";
    assert!(text.ends_with(expected), "{text}");
}

#[test]
fn xo_chip_long_index() {
    // i := long 0x020A; load v0; exit; (pad); 0x20A: data
    let rom = [0xF0, 0x00, 0x02, 0x0A, 0xF0, 0x65, 0x00, 0xFD, 0x00, 0x00, 0x42];
    let text = octo(&rom);
    assert!(text.contains("\ti := long label-0\n\tload v0\n\texit\n"));
    assert!(text.contains(": label-0\n\t0x42\n"));
}

#[test]
fn quirk_comments_follow_the_configuration() {
    let rom = [0x00, 0xFD];
    let quirks = Quirks::new().with_shift(true).with_vf_order(true);
    let text = decompile(&rom, quirks).unwrap();
    assert!(text.starts_with("# analyzed with shifts"));
    assert!(text.contains("writes vf before"));
    assert!(!text.contains("load and store"));

    let config = EmitConfig::default()
        .with_quirk_comments(false)
        .with_indent(Indent::Spaces(2));
    let mut pipeline = Pipeline::new(&rom, quirks).unwrap().with_emit_config(config);
    pipeline.run();
    pipeline.finalize().unwrap();
    assert_eq!(pipeline.format(rom.len()).unwrap(), "\n: main\n  exit\n\n");
}

#[test]
fn pipeline_state_errors() {
    let rom = [0x00, 0xE0, 0x12, 0x00];
    let mut pipeline = Pipeline::new(&rom, Quirks::default()).unwrap();
    assert!(matches!(pipeline.format(rom.len()), Err(Error::NotFinalized(_))));
    assert!(matches!(
        pipeline.finalize(),
        Err(Error::AnalysisIncomplete { .. })
    ));

    while !pipeline.step_batch() {}
    pipeline.finalize().unwrap();
    assert!(matches!(pipeline.finalize(), Err(Error::AlreadyFinalized)));

    let first = pipeline.format(rom.len()).unwrap();
    assert_eq!(first, pipeline.format(rom.len()).unwrap());

    let oversized = vec![0u8; c8d::MAX_ROM_SIZE + 1];
    assert!(matches!(
        decompile(&oversized, Quirks::default()),
        Err(Error::RomTooLarge { .. })
    ));
}

#[test]
fn output_is_deterministic() {
    let rom = [
        0x60, 0x00, 0x22, 0x0A, 0x70, 0x01, 0x30, 0x08, 0x12, 0x02, 0xA2, 0x10, 0xD0, 0x11,
        0x00, 0xEE, 0x81, 0xC3,
    ];
    let first = octo(&rom);
    let second = octo(&rom);
    assert_eq!(first, second);
}

#[test]
fn report_matches_the_analysis() {
    let rom = [0x22, 0x06, 0x12, 0x04, 0x00, 0xFD, 0x00, 0xEE];
    let mut pipeline = Pipeline::new(&rom, Quirks::default()).unwrap();
    pipeline.run();
    pipeline.finalize().unwrap();
    let report = Report::new(pipeline.analysis().unwrap());

    assert_eq!(report.subroutines.len(), 1);
    assert_eq!(report.subroutines[0].name, "sub-0");
    assert_eq!(report.subroutines[0].address, "0x0206");
    assert_eq!(report.labels[0].name, "label-0");
    assert_eq!(report.regions.len(), 1);
    assert_eq!(report.regions[0].len, 8);

    let json = report.to_json().unwrap();
    let parsed: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}
