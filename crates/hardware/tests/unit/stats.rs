//! # Execution Statistics Tests

use armv2_core::core::arch::gpr::SP;
use armv2_core::{Exception, ExecStats, Halt};
use pretty_assertions::assert_eq;

use crate::common::builder::instruction::{
    Block, NE, alu_imm, b, ldr, mov_imm, mul, op, stm, str, swi, with_cond,
};
use crate::common::harness::{DATA_BASE, TestContext};

#[test]
fn test_counters_after_a_program() {
    let mut ctx = TestContext::new()
        .program(&[
            mov_imm(0, 3),
            mul(false, 1, 0, 0),
            str(1, 2, 0),
            ldr(3, 2, 0),
            stm(Block::Db, true, SP as u32, 0b11),
            alu_imm(op::CMP, true, 0, 0, 3, 0),
            with_cond(b(-8), NE),
            swi(1),
        ])
        .with_reg(2, DATA_BASE)
        .with_reg(SP, DATA_BASE + 0x100)
        .with_word(DATA_BASE, 0);

    assert_eq!(ctx.run(8), Halt::Completed);

    let stats = ctx.cpu.stats();
    assert_eq!(stats.instructions, 8);
    assert_eq!(stats.condition_skips, 1);
    assert_eq!(stats.inst_alu, 2);
    assert_eq!(stats.inst_multiply, 1);
    assert_eq!(stats.inst_store, 1);
    assert_eq!(stats.inst_load, 1);
    assert_eq!(stats.inst_block, 1);
    assert_eq!(stats.inst_branch, 0);
    assert_eq!(stats.inst_system, 1);
    assert_eq!(stats.exception_count(Exception::SoftwareInterrupt), 1);
    assert_eq!(stats.exceptions_taken(), 1);
    assert_eq!(ctx.cpu.pc(), 0x08);
    assert_eq!(ctx.get_reg(3), 9);
}

#[test]
fn test_breakpoints_are_counted_apart_from_vectored_exceptions() {
    let mut stats = ExecStats::default();
    stats.record_exception(Exception::Breakpoint);
    stats.record_exception(Exception::DataAbort);
    stats.record_exception(Exception::DataAbort);

    assert_eq!(stats.breakpoints, 1);
    assert_eq!(stats.exception_count(Exception::Breakpoint), 1);
    assert_eq!(stats.exception_count(Exception::DataAbort), 2);
    assert_eq!(stats.exceptions_taken(), 2);
}

#[test]
fn test_report_lists_every_section() {
    let mut stats = ExecStats {
        instructions: 10,
        inst_alu: 4,
        interrupts_raised: 2,
        interrupts_dropped: 1,
        ..Default::default()
    };
    stats.record_exception(Exception::Irq);

    let report = stats.to_string();

    for needle in [
        "ARMv2 EXECUTION STATISTICS",
        "sim_insts",
        "INSTRUCTION MIX",
        "op.alu",
        "EXCEPTIONS",
        "DataAbort",
        "AddressException",
        "IRQ",
        "irq.raised",
        "irq.dropped",
    ] {
        assert!(report.contains(needle), "missing {needle:?} in\n{report}");
    }
    assert!(report.contains("(40.00%)"));
}
