//! The whole proving analysis from start to finish, with progress output and
//! result prints.

use crate::preprocessing::dictionary::Dictionary;
use crate::preprocessing::parser::parse_fol_formula;
use crate::printing::Writer;
use crate::proving::theory::Theory;
use crate::result_print::*;
use crate::syntax::formula::Formula;

use std::collections::BTreeSet;
use std::time::SystemTime;

/// Decide a list of conjectures against a list of axioms. This comprises the
/// complete process from parsing to summarizing results.
///
/// All formulae are parsed through one shared dictionary, so a name denotes
/// the same symbol across every axiom and conjecture. Print the selected
/// amount of result info (no prints / verdicts / with progress and timings)
/// for each conjecture, and return the verdicts in input order.
pub fn analyse_entailment(
    axioms: Vec<String>,
    conjectures: Vec<String>,
    print_opt: PrintOptions,
) -> Result<Vec<bool>, String> {
    let start = SystemTime::now();
    let mut dictionary = Dictionary::new();
    let writer = Writer::default();

    print_if_allowed(
        "=========== PARSING PHASE ============".to_string(),
        print_opt,
    );
    print_if_allowed(
        format!(
            "Read {} axioms and {} conjectures.",
            axioms.len(),
            conjectures.len()
        ),
        print_opt,
    );
    print_if_allowed("-----".to_string(), print_opt);

    let mut axiom_set: BTreeSet<Formula> = BTreeSet::new();
    for (i, axiom) in axioms.iter().enumerate() {
        print_if_allowed(format!("Original axiom n.{}: {axiom}", i + 1), print_opt);
        let formula = parse_fol_formula(axiom.as_str(), &mut dictionary)
            .map_err(|e| format!("Error in axiom n.{}: {e}", i + 1))?;
        print_if_allowed(
            format!(
                "Parsed version:      {}",
                writer.write_formula(&formula, &dictionary)
            ),
            print_opt,
        );
        axiom_set.insert(formula);
    }
    print_if_allowed("-----".to_string(), print_opt);

    let mut theory = Theory::new(axiom_set);

    print_if_allowed(
        "=========== PROVING PHASE ============".to_string(),
        print_opt,
    );
    let mut verdicts = Vec::new();
    for (i, conjecture) in conjectures.iter().enumerate() {
        let formula = parse_fol_formula(conjecture.as_str(), &mut dictionary)
            .map_err(|e| format!("Error in conjecture n.{}: {e}", i + 1))?;

        let conjecture_start = SystemTime::now();
        let proved = theory.draw(&formula);
        print_if_allowed(
            format!(
                "Time to decide conjecture n.{}: {}ms",
                i + 1,
                conjecture_start.elapsed().unwrap().as_millis()
            ),
            print_opt,
        );
        print_verdict(
            i,
            &writer.write_formula(&formula, &dictionary),
            proved,
            print_opt,
        );
        verdicts.push(proved);
    }

    summarize_verdicts(&verdicts, start, print_opt);
    Ok(verdicts)
}
