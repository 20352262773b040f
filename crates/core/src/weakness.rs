//! Post-session classification of mistakes.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::model::{AnsweredQuestion, Operator, Question};

/// Operands above this count as "large numbers".
const LARGE_OPERAND: u32 = 70;

//
// ─── ENTRIES ───────────────────────────────────────────────────────────────────
//

/// Category of a weakness finding, with the counts behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeaknessKind {
    /// No mistakes at all.
    NoWeakness,
    Addition { errors: usize },
    Subtraction { errors: usize },
    /// Additions whose ones digits sum to ten or more.
    Carry { errors: usize },
    /// Subtractions whose ones digit must borrow.
    Borrow { errors: usize },
    /// Either operand above 70.
    LargeNumbers { errors: usize },
    /// The single question missed most often.
    CommonPattern {
        question_text: String,
        occurrences: usize,
    },
}

impl WeaknessKind {
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            WeaknessKind::NoWeakness => "Great job",
            WeaknessKind::Addition { .. } => "Addition",
            WeaknessKind::Subtraction { .. } => "Subtraction",
            WeaknessKind::Carry { .. } => "Carrying",
            WeaknessKind::Borrow { .. } => "Borrowing",
            WeaknessKind::LargeNumbers { .. } => "Large numbers",
            WeaknessKind::CommonPattern { .. } => "Common mistake",
        }
    }

    #[must_use]
    pub fn description(&self) -> String {
        match self {
            WeaknessKind::NoWeakness => "🎉 No weak spots found!".to_string(),
            WeaknessKind::Addition { errors } => {
                format!("Practice addition more ({errors} errors)")
            }
            WeaknessKind::Subtraction { errors } => {
                format!("Practice subtraction more ({errors} errors)")
            }
            WeaknessKind::Carry { errors } => {
                format!("Practice addition with carrying ({errors} errors)")
            }
            WeaknessKind::Borrow { errors } => {
                format!("Practice subtraction with borrowing ({errors} errors)")
            }
            WeaknessKind::LargeNumbers { errors } => {
                format!("Work on calculations with larger numbers ({errors} errors)")
            }
            WeaknessKind::CommonPattern { question_text, .. } => {
                format!("Frequently missed questions like \"{question_text}\"")
            }
        }
    }
}

/// One line of the weakness report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeaknessEntry {
    #[serde(flatten)]
    pub kind: WeaknessKind,
    pub title: String,
    pub description: String,
}

impl From<WeaknessKind> for WeaknessEntry {
    fn from(kind: WeaknessKind) -> Self {
        Self {
            title: kind.title().to_string(),
            description: kind.description(),
            kind,
        }
    }
}

impl fmt::Display for WeaknessEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Ordered findings; the order is part of the contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeaknessReport {
    entries: Vec<WeaknessEntry>,
}

impl WeaknessReport {
    #[must_use]
    pub fn entries(&self) -> &[WeaknessEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeaknessEntry> {
        self.entries.iter()
    }

    fn push(&mut self, kind: WeaknessKind) {
        self.entries.push(kind.into());
    }
}

impl<'a> IntoIterator for &'a WeaknessReport {
    type Item = &'a WeaknessEntry;
    type IntoIter = std::slice::Iter<'a, WeaknessEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

//
// ─── ANALYSIS ──────────────────────────────────────────────────────────────────
//

fn needs_carry(q: &Question) -> bool {
    q.operand1() % 10 + q.operand2() % 10 >= 10
}

fn needs_borrow(q: &Question) -> bool {
    q.operand1() % 10 < q.operand2() % 10
}

fn has_large_operand(q: &Question) -> bool {
    q.operand1() > LARGE_OPERAND || q.operand2() > LARGE_OPERAND
}

/// Most frequently missed question; ties go to the one missed first.
fn most_common(wrong_answers: &[AnsweredQuestion]) -> Option<(&Question, usize)> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(&Question, usize)> = Vec::new();

    for answered in wrong_answers {
        let q = &answered.question;
        let key = format!("{}{}{}", q.operand1(), q.operator(), q.operand2());
        match slots.get(&key) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(key, counts.len());
                counts.push((q, 1));
            }
        }
    }

    counts
        .into_iter()
        .fold(None, |best, (q, n)| match best {
            Some((_, top)) if top >= n => best,
            _ => Some((q, n)),
        })
}

/// Builds the weakness report for a list of wrong answers.
///
/// Entries appear in a fixed order: operator weakness, carrying, borrowing,
/// large numbers, most common mistake. The operator entry names addition only
/// when it strictly outnumbers subtraction; otherwise it names subtraction if
/// there is any subtraction mistake, so a tie reports subtraction.
#[must_use]
pub fn analyze_weakness(wrong_answers: &[AnsweredQuestion]) -> WeaknessReport {
    let mut report = WeaknessReport::default();

    if wrong_answers.is_empty() {
        report.push(WeaknessKind::NoWeakness);
        return report;
    }

    let (additions, subtractions): (Vec<&Question>, Vec<&Question>) = wrong_answers
        .iter()
        .map(|a| &a.question)
        .partition(|q| q.operator() == Operator::Add);

    let carry = additions.iter().filter(|q| needs_carry(q)).count();
    let borrow = subtractions.iter().filter(|q| needs_borrow(q)).count();
    let large = wrong_answers
        .iter()
        .filter(|a| has_large_operand(&a.question))
        .count();

    if additions.len() > subtractions.len() {
        report.push(WeaknessKind::Addition {
            errors: additions.len(),
        });
    } else if !subtractions.is_empty() {
        report.push(WeaknessKind::Subtraction {
            errors: subtractions.len(),
        });
    }

    if carry > 0 {
        report.push(WeaknessKind::Carry { errors: carry });
    }
    if borrow > 0 {
        report.push(WeaknessKind::Borrow { errors: borrow });
    }
    if large > 0 {
        report.push(WeaknessKind::LargeNumbers { errors: large });
    }

    if let Some((q, occurrences)) = most_common(wrong_answers) {
        report.push(WeaknessKind::CommonPattern {
            question_text: q.display_text().to_string(),
            occurrences,
        });
    }

    report
}
