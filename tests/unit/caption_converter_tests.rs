/*!
 * Tests for timed-text XML to SRT conversion
 */

use savetube::caption_converter::{self, convert, parse_captions, CaptionEntry};
use savetube::errors::CaptionError;
use crate::common;

fn wrap(body: &str) -> String {
    format!("<timedtext format=\"3\"><body>{}</body></timedtext>", body)
}

/// Parse the "start --> end" line of every block
fn block_times(srt: &str) -> Vec<(String, String)> {
    srt.lines()
        .filter(|line| line.contains(" --> "))
        .map(|line| {
            let (start, end) = line.split_once(" --> ").unwrap();
            (start.to_string(), end.to_string())
        })
        .collect()
}

/// Test the documented two-cue example end to end
#[test]
fn test_convert_withOverlappingPair_shouldClampFirstEnd() {
    let srt = convert(common::SAMPLE_XML).unwrap();
    assert_eq!(srt, common::SAMPLE_SRT);
}

/// Test that timestamps are zero padded to three millisecond digits
#[test]
fn test_format_timestamp_withSmallMillis_shouldPad() {
    assert_eq!(caption_converter::format_timestamp(3890), "00:00:03,890");
    assert_eq!(caption_converter::format_timestamp(3007), "00:00:03,007");
    assert_eq!(caption_converter::format_timestamp(0), "00:00:00,000");
    assert_eq!(caption_converter::format_timestamp(5_025_678), "01:23:45,678");
}

/// Test that whitespace-only nodes are dropped without consuming a number
#[test]
fn test_convert_withWhitespaceNode_shouldKeepNumbersContiguous() {
    let xml = wrap(
        "<p t=\"0\" d=\"1000\">one</p>\
         <p t=\"1000\" d=\"1000\">   \n  </p>\
         <p t=\"2000\" d=\"1000\">two</p>",
    );
    let srt = convert(&xml).unwrap();

    let expected = "1\n00:00:00,000 --> 00:00:01,000\none\n\n2\n00:00:02,000 --> 00:00:03,000\ntwo";
    assert_eq!(srt, expected);
}

/// Test that an empty node without a start offset is skipped, not an error
#[test]
fn test_convert_withEmptyNodeMissingStart_shouldSkipSilently() {
    let xml = wrap("<p d=\"5\"/><p t=\"10\" d=\"5\">kept</p>");
    let entries = parse_captions(&xml).unwrap();

    assert_eq!(entries, vec![CaptionEntry::new(10, 5, "kept".to_string())]);
}

/// Test that a missing duration defaults to zero
#[test]
fn test_parse_captions_withoutDuration_shouldEndAtStart() {
    let xml = wrap("<p t=\"1500\">no duration</p><p t=\"2000\" d=\"abc\">bad duration</p>");
    let entries = parse_captions(&xml).unwrap();

    assert_eq!(entries[0].end_ms, 1500);
    assert_eq!(entries[1].start_ms, 2000);
    assert_eq!(entries[1].end_ms, 2000);
}

/// Test that nested markup contributes its text in document order
#[test]
fn test_parse_captions_withNestedMarkup_shouldConcatenateText() {
    let xml = wrap("<p t=\"0\" d=\"1000\"><s>Hel</s>lo <s ac=\"1\">there</s> friend</p>");
    let entries = parse_captions(&xml).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "Hello there friend");
}

/// Test text normalization on a full document
#[test]
fn test_parse_captions_withSpacesAndEntities_shouldNormalize() {
    let xml = wrap("<p t=\"0\" d=\"1\">  a\n\nb  c &amp;#39;x&amp;#39; </p>");
    let entries = parse_captions(&xml).unwrap();

    // "a\n\nb" becomes "a  b" then one collapse pass gives "a b"
    assert_eq!(entries[0].text, "a b c 'x'");
}

/// Test that only adjacent pairs are corrected in a three-way overlap
#[test]
fn test_convert_withThreeWayOverlap_shouldSatisfyPairwiseOrder() {
    let xml = wrap(
        "<p t=\"0\" d=\"9000\">a</p>\
         <p t=\"1000\" d=\"5000\">b</p>\
         <p t=\"2000\" d=\"500\">c</p>",
    );
    let mut entries = parse_captions(&xml).unwrap();
    caption_converter::correct_overlaps(&mut entries);

    for pair in entries.windows(2) {
        assert!(pair[0].end_ms <= pair[1].start_ms);
    }
    assert_eq!(entries[0].end_ms, 1000);
    assert_eq!(entries[1].end_ms, 2000);
    assert_eq!(entries[2].end_ms, 2500);
}

/// Test that correction never extends an end time
#[test]
fn test_correct_overlaps_withGap_shouldNotExtend() {
    let mut entries = vec![
        CaptionEntry::new(0, 500, "a".to_string()),
        CaptionEntry::new(2000, 500, "b".to_string()),
    ];
    caption_converter::correct_overlaps(&mut entries);

    assert_eq!(entries[0].end_ms, 500);
    assert_eq!(entries[1].end_ms, 2500);
}

/// Test that sequence numbers match their output position
#[test]
fn test_convert_withManyNodes_shouldNumberSequentially() {
    let body: String = (0..25)
        .map(|i| format!("<p t=\"{}\" d=\"900\">line {}</p>", i * 1000, i))
        .collect();
    let srt = convert(&wrap(&body)).unwrap();

    let numbers: Vec<usize> = srt
        .split("\n\n")
        .map(|block| block.lines().next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(numbers, (1..=25).collect::<Vec<_>>());
    assert_eq!(block_times(&srt).len(), 25);
}

/// Test that conversion is deterministic
#[test]
fn test_convert_withSameInput_shouldBeByteIdentical() {
    let first = convert(common::SAMPLE_XML).unwrap();
    let second = convert(common::SAMPLE_XML).unwrap();
    assert_eq!(first, second);
}

/// Test that a document with an empty body yields empty output
#[test]
fn test_convert_withEmptyBody_shouldReturnEmptyString() {
    assert_eq!(convert(&wrap("")).unwrap(), "");
    assert_eq!(convert(&wrap("<p t=\"0\"> </p>")).unwrap(), "");
}

/// Test that output has no trailing blank line
#[test]
fn test_convert_withValidInput_shouldNotEndWithWhitespace() {
    let srt = convert(common::SAMPLE_XML).unwrap();
    assert!(!srt.ends_with('\n'));
    assert!(!srt.ends_with(' '));
}

/// Test that malformed XML is rejected
#[test]
fn test_convert_withMalformedXml_shouldReturnParseError() {
    let result = convert("<timedtext><body><p t=\"0\">oops</body>");
    assert!(matches!(result, Err(CaptionError::Parse(_))));

    assert!(matches!(convert(""), Err(CaptionError::Parse(_))));
}

/// Test that a document without a body container is rejected
#[test]
fn test_convert_withoutBody_shouldReturnMissingBody() {
    let result = convert("<timedtext><head/></timedtext>");
    assert_eq!(result, Err(CaptionError::MissingBody));

    // Only a direct child of the root counts
    let nested = convert("<timedtext><head><body><p t=\"0\">x</p></body></head></timedtext>");
    assert_eq!(nested, Err(CaptionError::MissingBody));
}

/// Test that a non-empty node without a start offset fails the whole call
#[test]
fn test_convert_withMissingStart_shouldReportNodeIndex() {
    let xml = wrap("<p t=\"0\">ok</p><p/><p d=\"10\">no start</p>");
    let result = convert(&xml);

    assert_eq!(
        result,
        Err(CaptionError::MissingAttribute { attribute: "t", node_index: 2 })
    );
}

/// Test that an unreadable start offset fails the whole call
#[test]
fn test_convert_withNonNumericStart_shouldReturnInvalidAttribute() {
    let result = convert(&wrap("<p t=\"soon\">text</p>"));

    match result {
        Err(CaptionError::InvalidAttribute { attribute, value, node_index }) => {
            assert_eq!(attribute, "t");
            assert_eq!(value, "soon");
            assert_eq!(node_index, 0);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

/// Test that entity references without a semicolon are decoded in caption text
#[test]
fn test_convert_withLegacyEntities_shouldDecodeWithoutSemicolon() {
    let xml = wrap("<p t=\"0\" d=\"1000\">&amp;lt &amp;#39 &amp;amp x &amp;copy 2020</p>");
    let entries = parse_captions(&xml).unwrap();

    assert_eq!(entries[0].text, "< ' & x \u{a9} 2020");
    assert_eq!(caption_converter::normalize_text("&lt"), "<");
    assert_eq!(caption_converter::normalize_text("&#39"), "'");
    assert_eq!(caption_converter::normalize_text("&amp x"), "& x");
}

/// Test that a document with an internal DTD is accepted and its entities expanded
#[test]
fn test_convert_withInternalDtd_shouldExpandEntities() {
    let xml = "<?xml version=\"1.0\"?>\
<!DOCTYPE timedtext [<!ENTITY who \"World\">]>\
<timedtext><body><p t=\"0\" d=\"1000\">Hello &who;</p></body></timedtext>";
    let srt = convert(xml).unwrap();

    assert_eq!(srt, "1\n00:00:00,000 --> 00:00:01,000\nHello World");
}
