//! Rendering and the one-line feedback surface.
//!
//! Post fields are printed as plain text, never spliced into any markup, so a
//! hostile title or author cannot inject anything into the output.

use blog_core::Post;

/// Where rendered posts and status feedback go.
pub trait Screen {
    /// Replace the rendered post list with `posts`, one block per post.
    fn show_posts(&mut self, posts: &[Post]);

    /// Overwrite the status line. Each call replaces the previous message.
    fn show_feedback(&mut self, message: &str, is_error: bool);
}

const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const RESET: &str = "\x1b[0m";

pub struct TerminalScreen;

impl TerminalScreen {
    fn format_post(post: &Post) -> String {
        let mut block = format!(
            "[{}] {}\n{}\nAuthor: {}\nCreated: {}\n",
            post.id, post.title, post.content, post.author, post.created
        );
        if let Some(updated) = post.updated {
            block.push_str(&format!("Updated: {updated}\n"));
        }
        block
    }
}

impl Screen for TerminalScreen {
    fn show_posts(&mut self, posts: &[Post]) {
        for post in posts {
            println!();
            print!("{}", Self::format_post(post));
        }
    }

    fn show_feedback(&mut self, message: &str, is_error: bool) {
        let color = if is_error { RED } else { BLUE };
        println!("{color}{message}{RESET}");
    }
}
