mod test_utils;

use proptest::prelude::*;
use study_query::{extract, extract_all, QuestionRecord, QuestionType};
use test_utils::{CLASSIC_RESPONSE, TEST_RESPONSE};

fn test_records(text: &str) -> Vec<study_query::TestRecord> {
    extract(text, QuestionType::Test, "topic")
        .into_iter()
        .map(|q| match q.record {
            QuestionRecord::Test(r) => r,
            other => panic!("expected a test record, got {:?}", other),
        })
        .collect()
}

fn classic_records(text: &str) -> Vec<study_query::ClassicRecord> {
    extract(text, QuestionType::Classic, "topic")
        .into_iter()
        .map(|q| match q.record {
            QuestionRecord::Classic(r) => r,
            other => panic!("expected a classic record, got {:?}", other),
        })
        .collect()
}

#[test]
fn classic_well_formed_pairs() {
    let records = classic_records(
        "Soru 1: Nedir X?\nCevap 1: X budur.\n\nSoru 2: Nedir Y?\nCevap 2: Y budur.",
    );
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].question_text, "Nedir X?");
    assert_eq!(records[0].answer_text, "X budur.");
    assert_eq!(records[1].question_text, "Nedir Y?");
    assert_eq!(records[1].answer_text, "Y budur.");
}

#[test]
fn test_well_formed_block() {
    let records = test_records(
        "Soru 1: Hangisi bir gezegendir?\nA) Ay\nB) Güneş\nC) Mars\nD) Halley\nDoğru Cevap: C\nAçıklama: çünkü...",
    );
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].question_text, "Hangisi bir gezegendir?");
    assert_eq!(records[0].options, ["Ay", "Güneş", "Mars", "Halley"].map(String::from));
    assert_eq!(records[0].correct_option_index, 2);
    assert_eq!(records[0].explanation, "çünkü...");
}

#[test]
fn test_missing_explanation_is_synthesized() {
    let records = test_records(
        "Soru 1: Hangisi bir gezegendir?\nA) Ay\nB) Güneş\nC) Mars\nD) Halley\nDoğru Cevap: C",
    );
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].correct_option_index, 2);
    assert_eq!(records[0].explanation, "Doğru cevap: C");
}

#[test]
fn three_option_block_is_dropped_but_later_blocks_survive() {
    let text = "Soru 1: Eksik soru?
A) bir
B) iki
C) üç
Doğru Cevap: A
Soru 2: Tam soru?
A) bir
B) iki
C) üç
D) dört
Doğru Cevap: D
Açıklama: Dört doğrudur.";
    let records = test_records(text);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].question_text, "Tam soru?");
    assert_eq!(records[0].correct_option_index, 3);
}

#[test]
fn bold_formatting_and_lowercase_letters_are_handled() {
    let records = test_records(TEST_RESPONSE);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].question_text, "Sabit bir fonksiyonun türevi nedir?");
    assert_eq!(records[0].correct_option_index, 1);
    assert_eq!(records[0].explanation, "Sabitin değişimi yoktur.");
    assert_eq!(records[1].explanation, "Doğru cevap: A");

    let lower = test_records("Soru 1: S?\nA) a\nB) b\nC) c\nD) d\nDoğru Cevap: d");
    assert_eq!(lower[0].correct_option_index, 3);
    assert_eq!(lower[0].explanation, "Doğru cevap: d");
}

#[test]
fn unknown_answer_letter_defaults_to_first_option() {
    let records = test_records("Soru 1: S?\nA) a\nB) b\nC) c\nD) d\nDoğru Cevap: E");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].correct_option_index, 0);
}

#[test]
fn multi_line_fields_are_joined_with_spaces() {
    let classic = classic_records(
        "Soru 1: Newton'un ikinci yasası\nnasıl ifade edilir?\nCevap 1: F = m * a\nolarak yazılır.",
    );
    assert_eq!(classic.len(), 1);
    assert_eq!(classic[0].question_text, "Newton'un ikinci yasası nasıl ifade edilir?");
    assert_eq!(classic[0].answer_text, "F = m * a olarak yazılır.");

    let test = test_records(
        "Soru 1: Aşağıdakilerden hangisi\ndoğrudur?\nA) a\nB) b\nC) c\nD) d\nDoğru Cevap: B\nAçıklama: İlk satır\nikinci satır.",
    );
    assert_eq!(test.len(), 1);
    assert_eq!(test[0].question_text, "Aşağıdakilerden hangisi doğrudur?");
    assert_eq!(test[0].explanation, "İlk satır ikinci satır.");
}

#[test]
fn separators_and_preamble_are_ignored() {
    let text = "İşte sorularınız:\n---\nSoru 1: X?\nCevap 1: Y.\n---\n";
    let records = classic_records(text);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].question_text, "X?");
    assert_eq!(records[0].answer_text, "Y.");
}

#[test]
fn question_without_answer_is_dropped() {
    let records = classic_records("Soru 1: Cevapsız?\nSoru 2: Tam mı?\nCevap 2: Evet.");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].question_text, "Tam mı?");
}

#[test]
fn prose_without_markers_yields_nothing() {
    assert!(extract("Bugün hava güzel.\nYarın yağmur var.", QuestionType::Classic, "t").is_empty());
    assert!(extract("Bugün hava güzel.", QuestionType::Test, "t").is_empty());
}

#[test]
fn extract_all_keeps_type_groups_in_order() {
    let out = extract_all(
        [
            (QuestionType::Test, TEST_RESPONSE),
            (QuestionType::Classic, CLASSIC_RESPONSE),
        ],
        "topic-9",
    );
    let types: Vec<QuestionType> = out.iter().map(|q| q.question_type()).collect();
    assert_eq!(
        types,
        vec![
            QuestionType::Test,
            QuestionType::Test,
            QuestionType::Classic,
            QuestionType::Classic
        ]
    );
    assert!(out.iter().all(|q| q.topic_id == "topic-9"));
}

#[test]
fn records_serialize_with_type_tag() {
    let out = extract(CLASSIC_RESPONSE, QuestionType::Classic, "t1");
    let json = serde_json::to_value(&out[0]).unwrap();
    assert_eq!(json["type"], "classic");
    assert_eq!(json["topic_id"], "t1");
    assert_eq!(json["question_text"], "Türev nedir?");
}

fn phrase() -> impl Strategy<Value = String> {
    "[a-z]{1,8}( [a-z]{1,8}){0,3}"
}

prop_compose! {
    fn test_block()(
        question in phrase(),
        options in prop::array::uniform4(phrase()),
        letter in prop::sample::select(vec!["A", "B", "C", "D"]),
        explanation in prop::option::of(phrase()),
    ) -> (String, [String; 4], &'static str, Option<String>) {
        (question, options, letter, explanation)
    }
}

proptest! {
    #[test]
    fn every_well_formed_test_block_yields_one_record(blocks in prop::collection::vec(test_block(), 0..6)) {
        let mut text = String::new();
        for (i, (question, options, letter, explanation)) in blocks.iter().enumerate() {
            text.push_str(&format!("Soru {}: {}\n", i + 1, question));
            for (prefix, option) in ["A)", "B)", "C)", "D)"].iter().zip(options) {
                text.push_str(&format!("{} {}\n", prefix, option));
            }
            text.push_str(&format!("Doğru Cevap: {}\n", letter));
            if let Some(explanation) = explanation {
                text.push_str(&format!("Açıklama: {}\n", explanation));
            }
            text.push('\n');
        }

        let records = test_records(&text);
        prop_assert_eq!(records.len(), blocks.len());
        for (record, (question, options, letter, explanation)) in records.iter().zip(&blocks) {
            prop_assert_eq!(&record.question_text, question);
            prop_assert_eq!(&record.options, options);
            prop_assert_eq!(record.correct_option_index, "ABCD".find(*letter).unwrap());
            let expected = explanation.clone().unwrap_or_else(|| format!("Doğru cevap: {}", letter));
            prop_assert_eq!(&record.explanation, &expected);
        }
    }

    #[test]
    fn every_well_formed_classic_pair_yields_one_record(pairs in prop::collection::vec((phrase(), phrase()), 0..6)) {
        let text: String = pairs
            .iter()
            .enumerate()
            .map(|(i, (q, a))| format!("Soru {n}: {q}\nCevap {n}: {a}\n\n", n = i + 1, q = q, a = a))
            .collect();

        let records = classic_records(&text);
        prop_assert_eq!(records.len(), pairs.len());
        for (record, (q, a)) in records.iter().zip(&pairs) {
            prop_assert_eq!(&record.question_text, q);
            prop_assert_eq!(&record.answer_text, a);
        }
    }
}
