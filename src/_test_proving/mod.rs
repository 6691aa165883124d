/// **(internal)** Test end-to-end proving scenarios: parse axiom and
/// conjecture strings, run the tableau search, and compare the verdicts with
/// the expected ones.
mod _test_scenarios;

/// **(internal)** Test the quantified properties of the whole pipeline, such
/// as soundness of `draw` on an empty axiom set and stability of verdicts
/// under simplification.
mod _test_properties;

/// **(internal)** Utilities used in tests, such as building theories from
/// formula strings.
mod _test_util;
