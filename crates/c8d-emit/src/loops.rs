//! Structured loop recovery.

use c8d_cfg::Analysis;
use c8d_isa::Instr;

/// Whether the reference from `tail` to `head` can render as `loop ... again`.
///
/// The tail must be an unconditional `jump head` at or after the head, and
/// every instruction from the head through the tail must be executed code
/// with no other subroutine entry and no jump back past the head.
pub fn is_loop_tail(analysis: &Analysis, head: u16, tail: u16, end: u32) -> bool {
    if tail < head || u32::from(tail) >= end {
        return false;
    }
    let program = analysis.program();
    if program.instr(tail) != Instr::Jump(head) {
        return false;
    }

    let mut scan = head;
    loop {
        if scan != head && analysis.subroutines().contains(scan) {
            return false;
        }
        if !analysis.class(scan).is_executed() {
            return false;
        }
        let instr = program.instr(scan);
        if let Instr::Jump(target) = instr {
            if target < head {
                return false;
            }
        }
        if scan >= tail {
            return scan == tail;
        }
        scan = scan.saturating_add(instr.size());
    }
}

#[cfg(test)]
mod tests {
    use c8d_cfg::Quirks;

    use super::*;

    fn analyze(rom: &[u8]) -> Analysis {
        Analysis::analyze(rom, Quirks::default()).unwrap()
    }

    fn end(rom: &[u8]) -> u32 {
        0x200 + u32::try_from(rom.len()).unwrap()
    }

    #[test]
    fn test_self_loop() {
        let rom = [0x00, 0xE0, 0x12, 0x00];
        let analysis = analyze(&rom);
        assert!(is_loop_tail(&analysis, 0x200, 0x202, end(&rom)));
        assert!(!is_loop_tail(&analysis, 0x200, 0x202, 0x202));
    }

    #[test]
    fn test_forward_jump_is_not_a_loop() {
        // jump 0x204; exit; exit
        let rom = [0x12, 0x04, 0x00, 0xFD, 0x00, 0xFD];
        let analysis = analyze(&rom);
        assert!(!is_loop_tail(&analysis, 0x204, 0x200, end(&rom)));
    }

    #[test]
    fn test_span_with_unused_bytes_is_not_a_loop() {
        // 0x200: v0 := 1   0x202: if v0 == 1 then   0x204: jump 0x208
        // 0x206: unused    0x208: jump 0x200
        let rom = [0x60, 0x01, 0x40, 0x01, 0x12, 0x08, 0xAB, 0xCD, 0x12, 0x00];
        let analysis = analyze(&rom);
        assert!(!is_loop_tail(&analysis, 0x200, 0x208, end(&rom)));
    }

    #[test]
    fn test_span_with_subroutine_entry_is_not_a_loop() {
        // 0x200: call 0x204   0x202: jump 0x200
        // 0x204: return      0x206: jump 0x200 (unreachable)
        let rom = [0x22, 0x04, 0x12, 0x00, 0x00, 0xEE, 0x12, 0x00];
        let analysis = analyze(&rom);
        assert!(is_loop_tail(&analysis, 0x200, 0x202, end(&rom)));
        assert!(!is_loop_tail(&analysis, 0x200, 0x206, end(&rom)));
    }
}
