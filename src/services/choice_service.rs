use rand::seq::SliceRandom;
use rand::Rng;

pub const DEFAULT_CHOICE_COUNT: usize = 4;

/// Builds a choice set of exactly `size` entries holding the correct answer
/// once (empty when `size` is 0). Distinct candidates other than the correct
/// answer are preferred; when there are too few, values from `fillers` pad
/// the set, then [`numeric_fillers`] once `fillers` runs dry. The final order
/// is shuffled.
pub fn compose_choices<R, C, F>(
    correct_answer: &str,
    candidates: C,
    size: usize,
    fillers: F,
    rng: &mut R,
) -> Vec<String>
where
    R: Rng + ?Sized,
    C: IntoIterator<Item = String>,
    F: IntoIterator<Item = String>,
{
    if size == 0 {
        return Vec::new();
    }
    let wanted = size - 1;

    let mut distractors: Vec<String> = Vec::new();
    for candidate in candidates {
        if candidate != correct_answer && !distractors.contains(&candidate) {
            distractors.push(candidate);
        }
    }
    distractors.shuffle(rng);
    distractors.truncate(wanted);

    if distractors.len() < wanted {
        tracing::debug!(
            have = distractors.len(),
            wanted,
            "not enough distinct distractors, padding with fillers"
        );
        for filler in fillers.into_iter().chain(numeric_fillers()) {
            if distractors.len() >= wanted {
                break;
            }
            if filler != correct_answer && !distractors.contains(&filler) {
                distractors.push(filler);
            }
        }
    }

    let mut choices = Vec::with_capacity(distractors.len() + 1);
    choices.push(correct_answer.to_string());
    choices.extend(distractors);
    shuffle(&mut choices, rng);
    choices
}

/// Fisher-Yates: walks from the last index down to 1, swapping each slot with
/// a uniformly drawn index in `[0, i]`.
pub fn shuffle<T, R>(items: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Numeric filler values: "0", "-1", "1", "-2", "2", ...
pub fn numeric_fillers() -> impl Iterator<Item = String> {
    (0i64..).flat_map(|n| if n == 0 { vec![0] } else { vec![-n, n] }).map(|n| n.to_string())
}
