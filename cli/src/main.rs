use std::io::{self, BufRead, Write};

use anyhow::Result;
use blog_cli::{Config, Controller, TerminalScreen, UreqTransport};
use blog_core::{SearchField, SortDirection, SortField};

const HELP: &str = "\
commands:
  base <url>                       set the API base URL
  list                             fetch and show all posts
  title <text>                     set the form's title field
  content <text>                   set the form's content field
  author <text>                    set the form's author field
  submit                           send the form (create, or update in edit mode)
  edit <id>                        prefill the form from a listed post
  delete <id>                      delete a post
  search <title|content|author> <query>
  sort <title|content|author|created|updated> [asc|desc]
  help                             show this message
  quit                             exit";

fn main() -> Result<()> {
    let config = Config::new()?;
    let mut controller = Controller::new(config, UreqTransport::new(), TerminalScreen);
    controller.startup()?;

    println!("blog client — type 'help' for commands");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match cmd {
            "help" => println!("{HELP}"),
            "quit" | "exit" => break,
            "base" => controller.set_base_url(rest),
            "title" => controller.set_title(rest),
            "content" => controller.set_content(rest),
            "author" => controller.set_author(rest),
            "submit" => controller.submit()?,
            "list" => controller.load_posts()?,
            "delete" => match rest.parse::<u64>() {
                Ok(id) => controller.delete_post(id)?,
                Err(_) => println!("usage: delete <id>"),
            },
            "edit" => match rest.parse::<u64>() {
                Ok(id) => controller.edit_post(id),
                Err(_) => println!("usage: edit <id>"),
            },
            "search" => {
                // A missing query still reaches the controller so the user
                // gets the same feedback the page showed.
                let (field, query) = match rest.split_once(' ') {
                    Some((field, query)) => (field, query.trim()),
                    None => (rest, ""),
                };
                match field.parse::<SearchField>() {
                    Ok(field) => controller.search_posts(field, query),
                    Err(_) => println!("usage: search <title|content|author> <query>"),
                }
            }
            "sort" => {
                let (field, direction) = rest.split_once(' ').unwrap_or((rest, "asc"));
                match (field.parse::<SortField>(), direction.trim().parse::<SortDirection>()) {
                    (Ok(field), Ok(direction)) => controller.sort_posts(field, direction),
                    _ => println!("usage: sort <field> [asc|desc]"),
                }
            }
            other => println!("unknown command: {other} (try 'help')"),
        }
    }
    Ok(())
}
