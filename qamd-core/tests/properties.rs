//! Property tests for formatting, encoding and the copy round trip

use proptest::prelude::*;

use qamd_core::codec::{decode_raw, encode_raw};
use qamd_core::format::make_title;
use qamd_core::highlight::{tokenize, Language};
use qamd_core::{format, render, CopyManager, Page};

proptest! {
    #[test]
    fn title_ends_with_question_mark(question in ".*") {
        let title = make_title(&question);
        prop_assert!(title.ends_with('?'));
        if question.ends_with('?') {
            prop_assert_eq!(&title, &question);
        } else {
            prop_assert_eq!(title, format!("{question}?"));
        }
    }

    #[test]
    fn formatted_document_keeps_whole_answer(question in "[a-z ]{0,20}", answer in ".*") {
        let doc = format(&question, &answer);
        prop_assert!(doc.text.ends_with(&answer));
    }

    #[test]
    fn codec_round_trip(code in any::<String>()) {
        prop_assert_eq!(decode_raw(&encode_raw(&code)).unwrap(), code);
    }

    #[test]
    fn tokens_partition_input(code in "[ -~\n\t]{0,200}") {
        for language in [Language::Script, Language::Python, Language::Markup, Language::Stylesheet] {
            let joined: String = tokenize(&code, language).iter().map(|t| t.text).collect();
            prop_assert_eq!(&joined, &code);
        }
    }

    #[test]
    fn copy_yields_exact_code(code in "[^`]{1,120}") {
        // Blank lines around a fence body are trimmed
        prop_assume!(code.chars().next().is_some_and(|c| !c.is_whitespace()));
        prop_assume!(code.chars().last().is_some_and(|c| !c.is_whitespace()));

        let answer = format!("Here:\n```js\n{code}\n```");
        let page = Page::from_html(&render(&format("q", &answer)));
        let mut manager = CopyManager::default();
        manager.attach(&page);

        let block = &page.blocks()[0];
        let request = manager.activate(&page, &block.id).unwrap();
        prop_assert_eq!(request.text, code);
    }
}
