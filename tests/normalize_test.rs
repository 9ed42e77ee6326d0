use email_plaintext::*;

#[test]
fn test_line_endings_and_whitespace() {
    let text = "  First line  \r\nSecond\t\tline\rThird    line   ";

    assert_eq!(normalize_text(text), "First line\nSecond line\nThird line");
}

#[test]
fn test_blank_lines_removed() {
    assert_eq!(normalize_text("One\n\n\n\n\nTwo\n \n\t\nThree"), "One\nTwo\nThree");
}

#[test]
fn test_boundary_and_header_remnants_removed() {
    let text = "--_000_BN6PR_\r\n\
                Content-Type: text/plain; charset=\"us-ascii\"\r\n\
                content-transfer-encoding: 7bit\r\n\
                Actual content\r\n\
                --_000_BN6PR_--";

    assert_eq!(normalize_text(text), "Actual content");
}

#[test]
fn test_cid_placeholders_removed() {
    assert_eq!(
        normalize_text("Logo [cid:image001.png@01D9] here\n[CID:banner.jpg]"),
        "Logo here"
    );
}

#[test]
fn test_control_and_invisible_characters_removed() {
    let text = "Hel\u{0}lo\u{7}\u{1B} wor\u{200D}ld\u{FEFF}\u{061C}\u{180E}";

    assert_eq!(normalize_text(text), "Hello world");
}

#[test]
fn test_noise_lines_dropped() {
    let text = "Header\n.\n-\n*\n|\n>\n==\n___\n= = =\n-.-\nFooter\n----\nKeep > quoted";

    assert_eq!(normalize_text(text), "Header\nFooter\nKeep > quoted");
}

#[test]
fn test_normalization_is_idempotent() {
    let inputs = [
        "  Hello\r\n\r\n\r\n   --boundary\r\n  Content-Type: text/plain\r\nWorld  \t again ",
        "\u{1}--abc leading control char\nline",
        "[cid:x]Content-Type: hidden\nvisible text",
        "a  b\n\n\n\nc\n=\n . \n",
        "Plain sentence that is already clean.",
        "[ci[cid:x]d:y] hello there friend",
    ];

    for input in inputs {
        let once = normalize_text(input);
        assert_eq!(normalize_text(&once), once, "input: {input:?}");
    }
}

#[test]
fn test_nested_cid_placeholders_removed() {
    assert_eq!(
        normalize_text("[ci[cid:x]d:y] hello there friend"),
        "hello there friend"
    );
}

#[test]
fn test_validity_check() {
    assert!(is_valid_text("Hello world, this is text."));
    assert!(is_valid_text("  abcdefghij  "));
    assert!(!is_valid_text(""));
    assert!(!is_valid_text("   \n\t  "));
    assert!(!is_valid_text("Too short"));
    assert!(!is_valid_text("-- == .. __ -- abc"));
    assert!(!is_valid_text("=-=-=-=-=-=-=-=-=-="));
    assert!(is_valid_text("-- == .. __ -- abcdef"));
}

#[test]
fn test_empty_or_cid_only() {
    assert!(is_empty_or_cid_only(""));
    assert!(is_empty_or_cid_only("   \n"));
    assert!(is_empty_or_cid_only(" [cid:image001.png@01D9F1A2.3B4C5D60] "));
    assert!(!is_empty_or_cid_only("[cid:a.png] and text"));
    assert!(!is_empty_or_cid_only("Some text"));
}
