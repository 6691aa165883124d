//! Print results of the proving process, from single colored verdicts up to
//! the aggregated summary.

use std::io::Write;
use std::time::SystemTime;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Enum of the supported output amounts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrintOptions {
    NoPrint,
    ShortPrint,
    MediumPrint,
    FullPrint,
}

/// Print the given text, but only if the correct print options are selected
/// (medium or full). This simplifies the code regarding printing (no
/// redundant if statements).
pub(crate) fn print_if_allowed(text: String, print_options: PrintOptions) {
    if print_options == PrintOptions::NoPrint || print_options == PrintOptions::ShortPrint {
        return;
    }
    println!("{}", text)
}

/// Print one conjecture's verdict, colored green (proved) or red (not
/// proved). The formula text itself is included from the medium level up.
pub(crate) fn print_verdict(
    index: usize,
    formula: &str,
    proved: bool,
    print_options: PrintOptions,
) {
    if print_options == PrintOptions::NoPrint {
        return;
    }
    if print_options == PrintOptions::ShortPrint {
        print!("Conjecture n.{}: ", index + 1);
    } else {
        print!("Conjecture n.{} ({formula}): ", index + 1);
    }

    let mut stdout = StandardStream::stdout(ColorChoice::Always);
    if proved {
        stdout
            .set_color(ColorSpec::new().set_fg(Some(Color::Green)))
            .unwrap();
        write!(&mut stdout, "PROVED").unwrap();
    } else {
        stdout
            .set_color(ColorSpec::new().set_fg(Some(Color::Red)))
            .unwrap();
        write!(&mut stdout, "NOT PROVED").unwrap();
    }
    stdout.reset().unwrap();
    writeln!(&mut stdout).unwrap();
}

/// Print the aggregated information regarding all verdicts and the total
/// computation time.
pub(crate) fn summarize_verdicts(
    verdicts: &[bool],
    start_time: SystemTime,
    print_options: PrintOptions,
) {
    if print_options == PrintOptions::NoPrint {
        return;
    }
    let proved = verdicts.iter().filter(|verdict| **verdict).count();
    println!("-----");
    println!("{} of {} conjectures proved", proved, verdicts.len());
    println!(
        "Total time: {}ms",
        start_time.elapsed().unwrap().as_millis()
    );
}
