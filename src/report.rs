use dicemath::{Evaluation, EvaluationVerbose};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
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

/// Print one evaluation the way the chat command rendered it: a title, the
/// value (or the errors), then rolls and trace when there are any.
pub fn print_evaluation(input: &str, run: &EvaluationVerbose, color: bool, details: bool) {
    let palette = ansi::Palette::new(color);
    let out = &run.evaluation;

    if out.is_ok() {
        println!("{}", palette.bold(palette.paint(format!("Evaluating: {}.", input.trim()), ansi::CYAN)));
        println!("  {}", palette.bold(palette.paint(format_value(out.value), ansi::GREEN)));
    } else {
        println!("{}", palette.bold(palette.paint(format!("ERROR! Received: `{}`.", input.trim()), ansi::RED)));
        for line in out.error_text.lines() {
            println!("  {}", palette.paint(line, ansi::YELLOW));
        }
    }

    print_rolls(out, &palette);
    print_trace(out, &palette);

    if details {
        print_details(run, &palette);
    }
}

fn print_rolls(out: &Evaluation, palette: &ansi::Palette) {
    if out.roll_summary.is_empty() {
        return;
    }
    println!("\n{}", palette.paint("━━━ Rolls ━━━", ansi::GRAY));
    for line in out.roll_summary.lines() {
        println!("  {}", palette.paint(line, ansi::BLUE));
    }
}

fn print_trace(out: &Evaluation, palette: &ansi::Palette) {
    if out.verbose_trace.is_empty() {
        return;
    }
    println!("\n{}", palette.paint("━━━ Trace ━━━", ansi::GRAY));
    for line in out.verbose_trace.lines() {
        println!("  {}", palette.dim(line.trim_start()));
    }
}

fn print_details(run: &EvaluationVerbose, palette: &ansi::Palette) {
    let details = &run.details;
    println!("\n{}", palette.paint("━━━ Details ━━━", ansi::GRAY));
    println!(
        "  {} {}",
        palette.dim("tiers:"),
        if details.tiers.is_empty() { palette.dim("none") } else { palette.paint(details.tiers.join(", "), ansi::CYAN) }
    );
    println!(
        "  {} {}  {} {}  {} {}  {} {}",
        palette.dim("steps:"),
        palette.paint(details.steps.len().to_string(), ansi::YELLOW),
        palette.dim("│ groups:"),
        palette.paint(details.groups_collapsed.to_string(), ansi::YELLOW),
        palette.dim("│ dice:"),
        palette.paint(details.dice_rolled.to_string(), ansi::YELLOW),
        palette.dim("│ depth:"),
        palette.paint(details.max_depth.to_string(), ansi::YELLOW),
    );
    println!("  {} {}", palette.dim("total:"), palette.paint(format!("{:?}", details.total), ansi::GREEN));
}

/// Whole numbers print without a fractional part.
fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 { format!("{}", v as i64) } else { format!("{}", v) }
}
