//! Prompt construction for report synthesis and transcript summarization

mod system;
mod user;

pub use system::{
    comparative_system_prompt, financial_system_prompt, full_system_prompt, news_system_prompt,
    transcript_combine_system_prompt, transcript_part1_system_prompt,
    transcript_part2_system_prompt, transcript_system_prompt,
};
pub use user::{
    analyze_user_message, compare_user_message, transcript_combine_user_message,
    transcript_part_user_message,
};
