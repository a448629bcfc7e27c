//! The simulated stack is empty after every statement-complete function.

mod common;

use common::*;
use test_case::test_case;
use ws_decompiler::{Options, decompile_to_ast, decompile_words};
use ws_ir::Stmt;
use ws_isa::parse_listing;

#[test_case(BRIDGE_LISTING, BRIDGE_OFFSET ; "bridge script")]
#[test_case("RESET\nPUSH_CONSTANT 1E\nWAIT_FRAMES\nWAIT\nRETURN", 0 ; "fused wait")]
#[test_case("RESET\nPUSH_CONSTANT 03\nCALL_FN_20\nRETURN", 0x10 ; "call function")]
#[test_case("RESET\nPUSH_TEMP_WORD 01\nPUSH_TEMP_WORD 01\nNEG\nWRITE", 0 ; "negated write")]
fn stack_is_empty_at_end(listing: &str, start: u32) {
    let instructions = parse_listing(listing).unwrap();
    let out = decompile_to_ast(&instructions, start).unwrap();
    assert!(out.residual_stack.is_empty(), "left: {:?}", out.residual_stack);
    assert!(!out.stmts.is_empty());
}

#[test]
fn dangling_value_is_reported() {
    let instructions = parse_listing("RESET\nPUSH_CONSTANT 03\nRETURN").unwrap();
    let out = decompile_to_ast(&instructions, 0).unwrap();
    assert_eq!(out.stmts, [Stmt::Return]);
    assert_eq!(out.residual_stack.len(), 1);
}

#[test]
fn words_and_listing_agree() {
    let text = decompile_words(&[0x100, 0x110, 0x01, 0x203], 0x500, Options::default()).unwrap();
    assert_eq!(text, "return");
}
