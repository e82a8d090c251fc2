use clap::Parser;

use super::*;

// =============================================================
// Argument parsing
// =============================================================

#[test]
fn capture_accepts_page_and_drag_together() {
    let cli = Cli::try_parse_from(["bugreport", "capture", "--page", "p.png", "--drag", "0,0:10,10", "-o", "out.jpg"])
        .unwrap();
    let Command::Capture(args) = cli.command else {
        panic!("expected capture command");
    };
    assert_eq!(args.page.drag.as_deref(), Some("0,0:10,10"));
    assert_eq!(args.out, PathBuf::from("out.jpg"));
}

#[test]
fn submit_with_page_but_no_drag_is_rejected() {
    let err = Cli::try_parse_from(["bugreport", "submit", "--location", "/papers/1234.5678/", "--page", "p.png"])
        .unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn submit_with_drag_but_no_page_is_rejected() {
    let err = Cli::try_parse_from(["bugreport", "submit", "--location", "/papers/1234.5678/", "--drag", "0,0:5,5"])
        .unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn submit_without_page_args_skips_screenshot() {
    let cli = Cli::try_parse_from(["bugreport", "submit", "--location", "/papers/1234.5678/", "--text", "typo"]).unwrap();
    let Command::Submit(args) = cli.command else {
        panic!("expected submit command");
    };
    assert!(open_session(&args.page).unwrap().is_none());
}
