//! Analytic-tableau theorem prover for first-order logic.
//!
//! Takes an input path to a file with axiom formulae and a path to a file
//! with conjecture formulae (one formula per line), and decides each
//! conjecture against the axioms. During (and after) the search, prints the
//! selected amount of information (default is one colored verdict line per
//! conjecture).

use fol_tableau_prover::analysis::analyse_entailment;
use fol_tableau_prover::load_inputs::load_formulae;
use fol_tableau_prover::result_print::PrintOptions;

use clap::builder::PossibleValuesParser;
use clap::Parser;

use std::path::Path;

/// Structure to collect CLI arguments.
#[derive(Parser)]
#[clap(
    version,
    about = "Analytic-tableau theorem prover for first-order logic."
)]
struct Arguments {
    /// Path to a file with axiom formulae, one per line.
    axioms_path: String,

    /// Path to a file with conjecture formulae to decide, one per line.
    conjectures_path: String,

    /// Choice of the amount of output regarding computation and results.
    #[clap(short, long, default_value = "short", value_parser = PossibleValuesParser::new(["none", "short", "medium", "full"]))]
    print_option: String,
}

/// Wrapper function to invoke the prover, works with CLI arguments.
fn main() {
    let args = Arguments::parse();

    // check if given paths are valid
    if !Path::new(args.axioms_path.as_str()).is_file() {
        println!("{} is not valid file", args.axioms_path);
        return;
    }
    if !Path::new(args.conjectures_path.as_str()).is_file() {
        println!("{} is not valid file", args.conjectures_path);
        return;
    }

    // read the axioms and the conjectures
    let axioms = match load_formulae(args.axioms_path.as_str()) {
        Ok(axioms) => axioms,
        Err(error) => {
            println!("{error}");
            return;
        }
    };
    let conjectures = match load_formulae(args.conjectures_path.as_str()) {
        Ok(conjectures) => conjectures,
        Err(error) => {
            println!("{error}");
            return;
        }
    };

    // compute the results
    let res = match args.print_option.as_str() {
        "none" => analyse_entailment(axioms, conjectures, PrintOptions::NoPrint),
        "short" => analyse_entailment(axioms, conjectures, PrintOptions::ShortPrint),
        "medium" => analyse_entailment(axioms, conjectures, PrintOptions::MediumPrint),
        "full" => analyse_entailment(axioms, conjectures, PrintOptions::FullPrint),
        // this cant really happen, just here to be exhaustive
        _ => Err(format!(
            "Wrong print option \"{}\".",
            args.print_option.as_str()
        )),
    };

    if let Err(error) = res {
        println!("{error}");
    }
}
