use chrono::{DateTime, Utc};
use colored::Colorize;
use timeago::Formatter;
use todoz::messages::{MessageLevel, OpMessage};
use todoz::model::TodoItem;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const DONE_MARKER: &str = "[x]";
const OPEN_MARKER: &str = "[ ]";

pub(crate) fn print_messages(messages: &[OpMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(crate) fn print_todos(todos: &[TodoItem]) {
    if todos.is_empty() {
        println!("No todos found.");
        return;
    }

    for (i, todo) in todos.iter().enumerate() {
        let idx_str = format!("{}. ", i + 1);
        let marker = if todo.completed { DONE_MARKER } else { OPEN_MARKER };

        let tags = if todo.tags.is_empty() {
            String::new()
        } else {
            format!(" #{}", todo.tags.join(" #"))
        };
        let label = format!("{}{}", todo.title, tags);

        let fixed_width = 2 + idx_str.width() + marker.width() + 1 + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let label_display = truncate_to_width(&label, available);
        let padding = available.saturating_sub(label_display.width());

        let marker_colored = if todo.completed {
            marker.green()
        } else {
            marker.normal()
        };

        println!(
            "  {}{} {}{}{}",
            idx_str,
            marker_colored,
            label_display,
            " ".repeat(padding),
            format_time_ago(todo.created_at).dimmed(),
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(timestamp);

    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
