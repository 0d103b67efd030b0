/// Canned conversational fragments seeded into a corpus so generated
/// sentences can open and close like lines in a dialogue.

use crate::core::corpus::Corpus;
use crate::schema::token::Category;

/// Seed both the teacher's and the student's fragments.
pub fn add_all_conversation(corpus: &mut Corpus) {
    add_teacher_conversation(corpus);
    add_only_student_conversation(corpus);
}

/// Fragments shared by every speaker plus the student's own.
pub fn add_student_conversation(corpus: &mut Corpus) {
    add_common_conversation(corpus);
    add_only_student_conversation(corpus);
}

pub fn add_only_student_conversation(corpus: &mut Corpus) {
    corpus.add_prefixes(
        [
            "I do not understand,",
            "It is understood,",
            "As I understand it,",
            "Of course,",
            "Agreed,",
        ],
        Category::Declaration,
    );

    corpus.add_suffixes(
        [", but then I'm lost", ", if I understand correctly", " EUREKA!"],
        Category::Declaration,
    );

    corpus.add_sentences(["This is not correct.", "I disagree."], None);
}

pub fn add_teacher_conversation(corpus: &mut Corpus) {
    corpus.add_prefixes(["You do not understand,"], Category::Declaration);
    corpus.add_sentences(
        ["I get the feeling that you do not understand the concept at hand."],
        Some(Category::Declaration),
    );

    corpus.add_sentences(
        [
            "This is not correct.",
            "I disagree.",
            "You must reconsider my earlier point.",
            "This is precisely the problem",
        ],
        Some(Category::Fact),
    );

    corpus.add_sentences(["Have you considered"], Some(Category::Question));
}

pub fn add_common_conversation(corpus: &mut Corpus) {
    corpus.add_prefixes(
        [
            "How does",
            "Could it be said",
            "Could it be said that",
            "Is it not the case",
            "Is it not the case that",
            "I wonder if",
        ],
        Category::Question,
    );

    corpus.add_sentences(["can you believe it?"], Some(Category::Question));

    corpus.add_suffixes(
        [
            "case at hand?",
            "case in question?",
            "that is true?",
            "that is false?",
            "that is consistent?",
            "that is inconsistent?",
            ", is that right?",
            ", or is it?",
            "or maybe not?",
        ],
        Category::Question,
    );
}
