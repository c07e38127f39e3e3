/*
 * vSMTP mail transfer agent
 *
 * Copyright (C) 2003 - viridIT SAS
 * Licensed under the Elastic License 2.0
 *
 * You should have received a copy of the Elastic License 2.0 along with
 * this program. If not, see https://www.elastic.co/licensing/elastic-license.
 *
 */

use ordered_headers::{read_message, Header, HeaderError, Kv, Options};

fn fixture(raw: &str) -> String {
    raw.replace('\n', "\r\n")
}

fn fields(header: &Header) -> Vec<(&str, &str)> {
    header
        .iter()
        .map(|Kv { key, value }| (key.as_str(), value.as_str()))
        .collect()
}

#[test]
fn read_fixture() {
    let raw = fixture(include_str!("mail/hello.eml"));
    let message = read_message(raw.as_bytes()).unwrap();

    pretty_assertions::assert_eq!(
        fields(&message.header),
        [
            ("Return-Path", "<bounce@example.com>"),
            (
                "Received",
                "from mx.example.org (mx.example.org [192.0.2.1]) by mx.example.com with ESMTP id 4F3A2; Fri, 21 Nov 1997 09:55:06 -0600"
            ),
            (
                "Received",
                "from client.example.org by mx.example.org; Fri, 21 Nov 1997 09:55:01 -0600"
            ),
            ("Date", "Fri, 21 Nov 1997 09:55:06 -0600"),
            ("From", "John Doe <jdoe@machine.example>"),
            ("To", "Mary Smith <mary@example.net>, bob@example.com"),
            ("Bcc", "hidden@example.com"),
            ("Subject", "Saying Hello"),
            ("Subject", "a duplicate"),
            ("Message-Id", "<1234@local.machine.example>"),
            ("X-Mailer", "Example Mail 1.0"),
            ("Content-Type", "text/plain; charset=us-ascii"),
        ]
    );
    pretty_assertions::assert_eq!(
        std::io::read_to_string(message.body).unwrap(),
        "This is a message just to say hello.\r\nSo, \"Hello\".\r\n"
    );

    message.header.check_mandatory().unwrap();
    pretty_assertions::assert_eq!(
        message.header.date().unwrap(),
        time::macros::datetime!(1997-11-21 09:55:06 -6)
    );
    pretty_assertions::assert_eq!(
        message
            .header
            .address_list("to")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        ["\"Mary Smith\" <mary@example.net>", "<bob@example.com>"]
    );
}

#[test]
fn render_fixture() {
    let raw = fixture(include_str!("mail/hello.eml"));
    let message = read_message(raw.as_bytes()).unwrap();

    pretty_assertions::assert_eq!(
        String::from_utf8(message.header.to_bytes(Options::default()).unwrap()).unwrap(),
        concat!(
            "Received: from mx.example.org (mx.example.org [192.0.2.1]) by mx.example.com\r\n",
            " with ESMTP id 4F3A2; Fri, 21 Nov 1997 09:55:06 -0600\r\n",
            "Received: from client.example.org by mx.example.org; Fri, 21 Nov 1997 09:55:01\r\n",
            " -0600\r\n",
            "Date: Fri, 21 Nov 1997 09:55:06 -0600\r\n",
            "From: \"John Doe\" <jdoe@machine.example>\r\n",
            "To: \"Mary Smith\" <mary@example.net>, <bob@example.com>\r\n",
            "Subject: Saying Hello\r\n",
            "Message-Id: <1234@local.machine.example>\r\n",
            "X-Mailer: Example Mail 1.0\r\n",
            "Content-Type: text/plain; charset=us-ascii\r\n",
        )
    );

    let all = String::from_utf8(
        message
            .header
            .to_bytes(Options {
                render_bcc: true,
                render_return_path: true,
                ..Options::default()
            })
            .unwrap(),
    )
    .unwrap();
    assert!(all.starts_with("Return-Path: <bounce@example.com>\r\n"));
    assert!(all.contains("\r\nBcc: <hidden@example.com>\r\n"));
    assert!(!all.contains("a duplicate"));
}

#[test]
fn rendered_fixture_reads_back() {
    let raw = fixture(include_str!("mail/hello.eml"));
    let header = read_message(raw.as_bytes()).unwrap().header;
    let rendered = header.to_bytes(Options::default()).unwrap();

    let again = read_message(&rendered[..]).unwrap().header;
    for key in ["Received", "Date", "Message-Id", "Content-Type"] {
        pretty_assertions::assert_eq!(
            again.get_all(key).collect::<Vec<_>>(),
            header.get_all(key).collect::<Vec<_>>()
        );
    }
    pretty_assertions::assert_eq!(again.to_bytes(Options::default()).unwrap(), rendered);
}

#[test_log::test]
fn relaxed_fixture() {
    let raw = fixture(include_str!("mail/relaxed.eml"));
    let message = read_message(raw.as_bytes()).unwrap();

    pretty_assertions::assert_eq!(
        fields(&message.header),
        [
            ("Sid", "0"),
            ("Audio Mode", "None"),
            ("Privilege", "127"),
            ("X-Spam-Status", "No, score=-0.1 required=5.0 tests=ALL_TRUSTED"),
            ("X-Spam-Status", "duplicated"),
            ("Subject", "Síneadh Fada"),
        ]
    );

    let map = message.header.to_map();
    pretty_assertions::assert_eq!(
        map.get_all("x-spam-status"),
        ["No, score=-0.1 required=5.0 tests=ALL_TRUSTED", "duplicated"]
    );

    pretty_assertions::assert_eq!(
        String::from_utf8(message.header.to_bytes(Options::default()).unwrap()).unwrap(),
        concat!(
            "Sid: 0\r\n",
            "Audio Mode: None\r\n",
            "Privilege: 127\r\n",
            "X-Spam-Status: No, score=-0.1 required=5.0 tests=ALL_TRUSTED\r\n",
            "X-Spam-Status: duplicated\r\n",
            "Subject: =?utf-8?q?S=C3=ADneadh_Fada?=\r\n",
        )
    );

    assert!(matches!(
        message.header.check_mandatory(),
        Err(HeaderError::MandatoryHeaderNotFound(name)) if name == "Date"
    ));
}

#[test]
fn edit_and_render() {
    let raw = fixture(include_str!("mail/hello.eml"));
    let mut header = read_message(raw.as_bytes()).unwrap().header;

    header.remove_all("received");
    header.remove_all("SUBJECT");
    header.set("subject", "Hello   again\t and again").unwrap();
    header.set("cc", "Ops <ops@example.com>").unwrap();
    header.add("x-trace", "  spaced\r\n  out  ");
    header.normalize();

    assert!(header.set("x-mailer", "Other 2.0").is_err());
    assert!(header.set("from", "nobody").is_err());

    pretty_assertions::assert_eq!(
        String::from_utf8(header.to_bytes(Options::default()).unwrap()).unwrap(),
        concat!(
            "Date: Fri, 21 Nov 1997 09:55:06 -0600\r\n",
            "From: \"John Doe\" <jdoe@machine.example>\r\n",
            "To: \"Mary Smith\" <mary@example.net>, <bob@example.com>\r\n",
            "Message-Id: <1234@local.machine.example>\r\n",
            "X-Mailer: Example Mail 1.0\r\n",
            "Content-Type: text/plain; charset=us-ascii\r\n",
            "Subject: Hello again and again\r\n",
            "Cc: \"Ops\" <ops@example.com>\r\n",
            "X-Trace: spaced out\r\n",
        )
    );
}

#[test]
fn long_value_round_trip() {
    let value = "a".repeat(16 * 1024);
    let raw = format!("Cookie: {value}\r\n\r\n");

    let header = read_message(raw.as_bytes()).unwrap().header;
    pretty_assertions::assert_eq!(header.get("Cookie"), value);

    // a single word is never split.
    pretty_assertions::assert_eq!(
        header.to_bytes(Options::default()).unwrap(),
        format!("Cookie: {value}\r\n").into_bytes()
    );
}

#[rstest::rstest]
#[case(format!("{}\x0b{}", "a".repeat(70), "b".repeat(10)), None)]
#[case(format!("{}\x0c{} {}", "a".repeat(40), "b".repeat(40), "c".repeat(10)), None)]
#[case("one\n \ntwo".to_string(), Some("one two".to_string()))]
#[case("one\r\n\t\r\n  two".to_string(), Some("one two".to_string()))]
fn rendered_value_reads_back(#[case] value: String, #[case] expected: Option<String>) {
    let mut header = Header::new();
    header.add("X-Value", value.as_str());
    let rendered = header.to_bytes(Options::default()).unwrap();

    let again = read_message(&rendered[..]).unwrap().header;
    pretty_assertions::assert_eq!(again.get("x-value"), expected.unwrap_or(value));
}
