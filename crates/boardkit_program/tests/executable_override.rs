//! The `QUARTUS_PGM` override is read when programming starts, not when the
//! programmer is built. Lives in its own test binary because it changes the
//! process environment.

#![cfg(unix)]

use boardkit_constraints::{BuildProducts, ProcessError, ProgramError, Toolchain};
use boardkit_program::{ProgramState, QuartusProgrammer, EXECUTABLE_ENV};

fn products() -> BuildProducts {
    let mut products = BuildProducts::new();
    products.insert("top.sof", b"sof".to_vec());
    products
}

#[test]
fn override_is_resolved_per_attempt() {
    std::env::remove_var(EXECUTABLE_ENV);
    let products = products();
    let default = QuartusProgrammer::new();
    let configured = QuartusProgrammer::configured(Some("/nonexistent/quartus_pgm"));
    assert_eq!(default.executable(), "quartus_pgm");

    // Set after both programmers exist.
    std::env::set_var(EXECUTABLE_ENV, "false");
    assert_eq!(default.executable(), "false");
    for programmer in [&default, &configured] {
        let report = programmer.program_with_report(&products, "top");
        assert_eq!(report.final_state(), ProgramState::Failed);
        match report.result {
            Err(ProgramError::Programming { executable, source }) => {
                assert_eq!(executable, "false");
                assert!(matches!(source, ProcessError::ExitStatus { code: Some(1) }));
            }
            other => panic!("expected Programming error, got {other:?}"),
        }
    }

    std::env::set_var(EXECUTABLE_ENV, "true");
    assert!(default.program(&products, "top").is_ok());

    std::env::remove_var(EXECUTABLE_ENV);
    match configured.program(&products, "top") {
        Err(ProgramError::Programming {
            executable,
            source: ProcessError::Spawn(_),
        }) => assert_eq!(executable, "/nonexistent/quartus_pgm"),
        other => panic!("expected Spawn error, got {other:?}"),
    }
}
