use chrono::NaiveDate;
use lectio::{CanonicalBook, RangeShape, ScheduleOutcome, ScheduleReport, SqlFragment, VerseRange};
use std::time::Duration;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

fn header(palette: &ansi::Palette, title: &str, input: &str) {
    println!("\n{}", palette.bold(palette.paint(format!("⚙  {title}: \"{input}\""), ansi::CYAN)));
}

fn section(palette: &ansi::Palette, name: &str) {
    println!("\n{}", palette.paint(format!("━━━ {name} ━━━"), ansi::GRAY));
}

fn timing(palette: &ansi::Palette, elapsed: Duration) {
    section(palette, "Timing");
    println!("  Total: {}", palette.paint(format!("{elapsed:?}"), ansi::GREEN));
    println!();
}

fn shape_name(shape: RangeShape) -> &'static str {
    match shape {
        RangeShape::SingleVerse => "single verse",
        RangeShape::SameChapter => "same chapter",
        RangeShape::SameBook => "same book",
        RangeShape::CrossBook => "cross book",
    }
}

fn print_range(palette: &ansi::Palette, range: &VerseRange) {
    println!(
        "  {} {} {}",
        palette.bold(palette.paint(range.to_string(), ansi::GREEN)),
        palette.dim("│"),
        palette.paint(shape_name(range.shape()), ansi::YELLOW),
    );
    println!(
        "      {} {} {}:{}  {} {} {}:{}",
        palette.dim("start:"),
        palette.paint(&range.start_book, ansi::BLUE),
        range.start_chapter,
        range.start_verse,
        palette.dim("│ end:"),
        palette.paint(&range.end_book, ansi::BLUE),
        range.end_chapter,
        range.end_verse,
    );
}

pub fn print_parse(input: &str, range: &VerseRange, label: Option<&str>, elapsed: Duration, color: bool) {
    let palette = ansi::Palette::new(color);
    header(&palette, "Parsing", input);

    section(&palette, "Range");
    print_range(&palette, range);
    if let Some(label) = label {
        println!("      {} {}", palette.dim("label:"), palette.paint(label, ansi::CYAN));
    }

    timing(&palette, elapsed);
}

pub fn print_resolve(input: &str, book: &CanonicalBook, elapsed: Duration, color: bool) {
    let palette = ansi::Palette::new(color);
    header(&palette, "Resolving", input);

    section(&palette, "Book");
    println!(
        "  {} {} {} {}",
        palette.bold(palette.paint(book.slug, ansi::GREEN)),
        palette.dim("│"),
        palette.paint(format!("#{}", book.ordinal), ansi::YELLOW),
        palette.dim(format!("{:?} Testament, {} chapters", book.testament(), book.chapter_count)),
    );

    timing(&palette, elapsed);
}

pub fn print_compile(input: &str, range: &VerseRange, sql: &SqlFragment, elapsed: Duration, color: bool) {
    let palette = ansi::Palette::new(color);
    header(&palette, "Compiling", input);

    section(&palette, "Range");
    print_range(&palette, range);

    section(&palette, "SQL");
    println!("  {}", palette.paint(&sql.clause, ansi::CYAN));

    section(&palette, "Parameters");
    if sql.params.is_empty() {
        println!("{}", palette.dim("  No parameters"));
    }
    for (idx, param) in sql.params.iter().enumerate() {
        println!(
            "  {} {}",
            palette.paint(format!("[{}]", idx + 1), ansi::GRAY),
            palette.paint(param.to_string(), ansi::YELLOW)
        );
    }

    timing(&palette, elapsed);
}

pub fn print_schedule(today: NaiveDate, reports: &[ScheduleReport], days: &[(NaiveDate, VerseRange)], color: bool) {
    let palette = ansi::Palette::new(color);
    header(&palette, "Scheduling", &today.to_string());

    section(&palette, "Runs");
    if reports.is_empty() {
        println!("{}", palette.dim("  Buffer already full, nothing scheduled"));
    }
    for report in reports {
        let month = format!("{}-{:02}", report.year, report.month);
        let outcome = match report.outcome {
            ScheduleOutcome::Scheduled => palette.paint(format!("✓ {} days", report.days), ansi::GREEN),
            ScheduleOutcome::AlreadyScheduled => palette.dim("✗ already scheduled"),
        };
        println!(
            "  {} {}  {} {}  {} {}  {}",
            palette.paint(month, ansi::BLUE),
            outcome,
            palette.dim("entries:"),
            palette.paint(report.entries_used.to_string(), ansi::YELLOW),
            palette.dim("fixed:"),
            palette.paint(report.fixed_date_days.to_string(), ansi::YELLOW),
            palette.dim(format!("{:?}", report.elapsed)),
        );
    }

    if !days.is_empty() {
        section(&palette, "Days");
        for (date, range) in days {
            let date = palette.paint(date.to_string(), ansi::GRAY);
            println!("  {} {}", date, palette.paint(range.to_string(), ansi::GREEN));
        }
    }
    println!();
}
