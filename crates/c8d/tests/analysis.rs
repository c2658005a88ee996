//! Properties of the reaching-set analysis over whole programs.

use c8d::{Analysis, Analyzer, Class, Quirks, Register, RegisterState};

/// A program with a counted loop, a subroutine called from two sites, a
/// data table read through `i` and a key-dependent branch.
const MIXED: [u8; 30] = [
    0x60, 0x00, // 0x200: v0 := 0
    0x22, 0x14, // 0x202: call 0x214
    0x70, 0x01, // 0x204: v0 += 1
    0x30, 0x04, // 0x206: if v0 != 4 then
    0x12, 0x02, // 0x208: jump 0x202
    0x22, 0x14, // 0x20A: call 0x214
    0xE1, 0xA1, // 0x20C: if v1 key then
    0x12, 0x00, // 0x20E: jump 0x200
    0x00, 0xFD, // 0x210: exit
    0x00, 0x00, // 0x212
    0xA2, 0x1A, // 0x214: i := 0x21A
    0xF0, 0x1E, // 0x216: i += v0
    0x00, 0xEE, // 0x218: return
    0x11, 0x22, 0x33, 0x44, // 0x21A: table
];

fn analyze(rom: &[u8]) -> Analysis {
    Analysis::analyze(rom, Quirks::default()).unwrap()
}

fn snapshot(analyzer: &Analyzer, len: u16) -> (Vec<Class>, Vec<Option<RegisterState>>) {
    let addrs = 0x200..0x200 + len;
    let classes = addrs.clone().map(|a| analyzer.class(a)).collect();
    let states = addrs.map(|a| analyzer.reaching(a).cloned()).collect();
    (classes, states)
}

/// Small deterministic generator for arbitrary byte soup.
fn xorshift(seed: &mut u32) -> u8 {
    *seed ^= *seed << 13;
    *seed ^= *seed >> 17;
    *seed ^= *seed << 5;
    (*seed >> 24) as u8
}

#[test]
fn classification_and_states_only_grow() {
    let len = u16::try_from(MIXED.len()).unwrap();
    let mut analyzer = Analyzer::new(&MIXED, Quirks::default()).unwrap();
    let (mut classes, mut states) = snapshot(&analyzer, len);

    let mut steps = 0;
    while !analyzer.step(1) {
        let (next_classes, next_states) = snapshot(&analyzer, len);
        for (before, after) in classes.iter().zip(&next_classes) {
            assert_eq!(before.join(*after), *after, "class moved backwards");
        }
        for (before, after) in states.iter().zip(&next_states) {
            if let Some(before) = before {
                let after = after.as_ref().expect("reached address lost its state");
                assert!(before.is_subset(after), "reaching set shrank");
            }
        }
        classes = next_classes;
        states = next_states;
        steps += 1;
        assert!(steps < 10_000);
    }
}

#[test]
fn arbitrary_buffers_terminate() {
    let mut seed = 0x2545_F491;
    for len in [16usize, 64, 128, 256, 512] {
        let rom: Vec<u8> = (0..len).map(|_| xorshift(&mut seed)).collect();
        let analysis = analyze(&rom);
        assert!(analysis.class(0x200).is_executed());
    }
}

#[test]
fn analysis_is_deterministic() {
    let first = analyze(&MIXED);
    let second = analyze(&MIXED);
    for addr in 0x200..0x220 {
        assert_eq!(first.class(addr), second.class(addr));
        assert_eq!(first.reaching(addr), second.reaching(addr));
    }
    assert_eq!(first.labels(), second.labels());
    assert_eq!(first.symbols(), second.symbols());
}

#[test]
fn mixed_program_tables() {
    let analysis = analyze(&MIXED);

    // the shared return lands after both call sites
    assert_eq!(analysis.successors(0x218), vec![0x204, 0x20C]);
    assert_eq!(analysis.subroutines().refs(0x214).collect::<Vec<_>>(), vec![0x202, 0x20A]);
    assert_eq!(analysis.symbols().subroutine(0x214), Some("sub-0"));

    // both call sites flow out of the shared return, so the counter saturates
    assert_eq!(analysis.successors(0x206), vec![0x208, 0x20A]);
    assert_eq!(analysis.reaching(0x206).unwrap().get(Register::V0).len(), 256);

    // both branches of the key test are live
    assert_eq!(analysis.successors(0x20C), vec![0x20E, 0x210]);
    assert_eq!(analysis.class(0x210), Class::Code);
    assert_eq!(analysis.class(0x212), Class::Unclassified);

    // i += v0 never touches memory, so the table stays unclassified, and the
    // pointer saturates one past the end of the ROM
    assert_eq!(analysis.class(0x21A), Class::Unclassified);
    let index = analysis.reaching(0x218).unwrap().get(Register::I);
    assert_eq!(index.values(), &[0x21A, 0x21B, 0x21C, 0x21D, 0x21E, 0x21F]);
}

#[test]
fn branch_precision() {
    // v0 := 5; if v0 != 5 then; clear; exit
    let analysis = analyze(&[0x60, 0x05, 0x30, 0x05, 0x00, 0xE0, 0x00, 0xFD]);
    assert_eq!(analysis.successors(0x202), vec![0x206]);
    assert_eq!(analysis.class(0x204), Class::Unclassified);
}

#[test]
fn masked_random_cardinality() {
    for mask in [0x00u8, 0x01, 0x07, 0x3F, 0x90, 0xFF] {
        let analysis = analyze(&[0xC3, mask, 0x00, 0xFD]);
        let v3 = analysis.reaching(0x202).unwrap().get(Register::V3);
        assert_eq!(v3.len(), 1 << mask.count_ones(), "mask {mask:#04x}");
    }
}

#[test]
fn self_modifying_store_is_smc() {
    // i := 0x200; save v0; exit
    let analysis = analyze(&[0xA2, 0x00, 0xF0, 0x55, 0x00, 0xFD]);
    assert_eq!(analysis.class(0x200), Class::Smc);
    assert_eq!(analysis.class(0x201), Class::Code);
    assert_eq!(analysis.class(0x202), Class::Code);
}

#[test]
fn quirks_change_the_reaching_sets() {
    // i := 0x208; load v1; save v1; exit; data
    let rom = [0xA2, 0x08, 0xF1, 0x65, 0xF1, 0x55, 0x00, 0xFD, 1, 2, 3, 4];

    let plain = analyze(&rom);
    assert_eq!(plain.class(0x20B), Class::Data);
    assert_eq!(plain.reaching(0x206).unwrap().get(Register::I).values(), &[0x20C]);

    let fixed = Analysis::analyze(&rom, Quirks::new().with_load_store(true)).unwrap();
    assert_eq!(fixed.class(0x20A), Class::Unclassified);
    assert_eq!(fixed.reaching(0x206).unwrap().get(Register::I).values(), &[0x208]);
}
