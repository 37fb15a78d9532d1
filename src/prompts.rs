//! Static inspiration pools: journaling prompts for guided entries and the
//! rotating quote on the home screen.

use rand::seq::SliceRandom;

pub const PROMPTS_PER_ENTRY: usize = 5;

pub const PROMPT_POOL: &[&str] = &[
    "What made you smile today?",
    "Describe a moment you felt proud of yourself.",
    "What is something you are looking forward to?",
    "Write about a challenge you faced recently and how you handled it.",
    "What are three things you are grateful for right now?",
    "Who is someone that made a difference in your day?",
    "What is a habit you would like to build, and why?",
    "Describe your ideal morning.",
    "What is something you learned this week?",
    "Write about a place where you feel completely at ease.",
    "What would you tell your younger self?",
    "What is weighing on your mind right now?",
    "Describe something beautiful you noticed recently.",
    "What does rest look like for you lately?",
    "Write about a conversation that stuck with you.",
    "What small win deserves celebrating today?",
    "If today had a title, what would it be?",
    "What are you ready to let go of?",
    "Describe how you want to feel one month from now.",
    "What is a memory that always lifts your spirits?",
];

pub const QUOTE_POOL: &[&str] = &[
    "The unexamined life is not worth living.",
    "Fill your paper with the breathings of your heart.",
    "Journal writing is a voyage to the interior.",
    "You can always edit a bad page. You can't edit a blank page.",
    "What would life be if we had no courage to attempt anything?",
    "Start writing, no matter what. The water does not flow until the faucet is turned on.",
    "A journal is your completely unaltered voice.",
    "Write what should not be forgotten.",
    "The habit of writing for my eye is good practice. It loosens the ligaments.",
    "Keep a notebook. Travel with it, eat with it, sleep with it.",
    "Preserve your memories, keep them well; what you forget you can never retell.",
    "In the journal I am at ease.",
];

/// Draws exactly `PROMPTS_PER_ENTRY` distinct prompts by shuffling the whole
/// pool and taking a prefix. Every call reshuffles, so repeated openings of
/// the prompts view show visibly different sets.
pub fn draw_prompts() -> Vec<&'static str> {
    let mut pool: Vec<&'static str> = PROMPT_POOL.to_vec();
    pool.shuffle(&mut rand::thread_rng());
    pool.truncate(PROMPTS_PER_ENTRY);
    pool
}

pub fn random_quote() -> &'static str {
    QUOTE_POOL
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn draws_exactly_five_distinct_prompts_from_the_pool() {
        for _ in 0..50 {
            let drawn = draw_prompts();
            assert_eq!(drawn.len(), PROMPTS_PER_ENTRY);

            let unique: HashSet<&str> = drawn.iter().copied().collect();
            assert_eq!(unique.len(), PROMPTS_PER_ENTRY);

            for prompt in drawn {
                assert!(PROMPT_POOL.contains(&prompt));
            }
        }
    }

    #[test]
    fn pool_is_large_enough_to_draw_from() {
        assert!(PROMPT_POOL.len() >= PROMPTS_PER_ENTRY);
    }

    #[test]
    fn random_quote_comes_from_the_pool() {
        for _ in 0..10 {
            assert!(QUOTE_POOL.contains(&random_quote()));
        }
    }
}
