use std::fs::{self};

use pretty_assertions::assert_eq;
use walkdir::WalkDir;
use wflow::{
    error::{Error, ParseError, RuntimeError},
    run_program,
    simulation::{Simulation, SimulationConfig},
};

#[test]
fn book_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, code) in extract_dsl_blocks(&content).into_iter().enumerate() {
            count += 1;
            if let Err(e) = run_program(&code, &SimulationConfig::default(), &mut std::io::sink()) {
                panic!("DSL example {} in {:?} failed:\n{}\nError: {}", i + 1, path, code, e);
            }
        }
    }

    assert!(count > 0, "No DSL examples found in book/src");
}

#[test]
fn example_script_runs() {
    let source = fs::read_to_string("tests/example.wflow").expect("example script exists");
    let config = SimulationConfig::new(3, 12.5).unwrap();
    let mut out = Vec::new();

    let simulation = run_program(&source, &config, &mut out).unwrap_or_else(|e| panic!("{e}"));
    let out = String::from_utf8(out).unwrap();

    assert_eq!(out.matches("=== Day").count(), 3);
    assert!(simulation.rivers().len() >= 3);
    assert!(simulation.rivers().iter().all(|(_, river)| river.dam_level() >= 0.0));
}

fn extract_dsl_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```wflow") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

/// Runs `src` for one day and returns what the program itself printed,
/// without the day header and summary.
fn program_output(src: &str, rainfall: f64) -> Result<String, Error> {
    let config = SimulationConfig::new(1, rainfall).unwrap();
    let mut out = Vec::new();
    run_program(src, &config, &mut out)?;

    let out = String::from_utf8(out).unwrap();
    let body = out.split_once("rainfall ===\n").map_or("", |(_, rest)| rest);
    let body = body.split("\n== River flows").next().unwrap_or_default();
    Ok(body.trim_end_matches("No river flows computed.\n").to_string())
}

fn simulate(src: &str, days: u32, rainfall: f64) -> Simulation {
    let config = SimulationConfig::new(days, rainfall).unwrap();
    run_program(src, &config, &mut std::io::sink()).unwrap_or_else(|e| panic!("Script failed: {e}"))
}

fn assert_success(src: &str) {
    if let Err(e) = run_program(src, &SimulationConfig::default(), &mut std::io::sink()) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) {
    if run_program(src, &SimulationConfig::default(), &mut std::io::sink()).is_ok() {
        panic!("Script succeeded but was expected to fail")
    }
}

fn assert_prints(src: &str, expected: &str) {
    match program_output(src, 1.0) {
        Ok(out) => assert_eq!(out, expected),
        Err(e) => panic!("Script failed: {e}"),
    }
}

fn parse_errors(src: &str) -> Vec<ParseError> {
    match run_program(src, &SimulationConfig::default(), &mut std::io::sink()) {
        Err(Error::Parse(errors)) => errors,
        Err(Error::Runtime(e)) => panic!("Expected parse errors, got runtime error: {e}"),
        Ok(_) => panic!("Script succeeded but was expected to fail to parse"),
    }
}

fn runtime_error(src: &str) -> RuntimeError {
    match run_program(src, &SimulationConfig::default(), &mut std::io::sink()) {
        Err(Error::Runtime(e)) => e,
        Err(Error::Parse(errors)) => panic!("Expected runtime error, got parse errors: {errors:?}"),
        Ok(_) => panic!("Script succeeded but was expected to fail"),
    }
}

#[test]
fn output_reports_current_flow() {
    assert_eq!(program_output("river A = 10\noutput A", 5.0).unwrap(), "A flow: 10.00 L/s\n");
}

#[test]
fn river_without_initializer_takes_rainfall() {
    let simulation = simulate("river A", 1, 5.0);

    assert_eq!(simulation.rivers().get("A").unwrap().intrinsic_flow(), 5.0);
}

#[test]
fn undeclared_dam_factor_is_one() {
    for flow in [0.0, 2.5, 10.0, 1234.5] {
        let simulation = simulate(&format!("river R = {flow}"), 1, 1.0);

        assert_eq!(simulation.rivers().get("R").unwrap().current_flow(), flow);
    }
}

#[test]
fn closed_dam_stops_flow() {
    for inflow in ["0", "3", "7.5", "rainfall * 4"] {
        let src = format!("river A = {inflow}\nriver B = 2\nflow B -> A\ndam A close");
        let simulation = simulate(&src, 2, 3.0);

        assert_eq!(simulation.rivers().get("A").unwrap().current_flow(), 0.0);
    }
}

#[test]
fn dam_adjust_uses_inflow() {
    let simulation = simulate("river A = 10\ndam A adjust inflow * 0.5", 1, 1.0);

    assert_eq!(simulation.rivers().get("A").unwrap().dam_factor(), 5.0);
}

#[test]
fn negative_dam_factor_aborts() {
    let error = runtime_error("river A = 10\ndam A adjust 0 - 1\nprint \"unreachable\"");

    assert!(matches!(error, RuntimeError::InvalidDamFactor { line: 2, .. }));
    assert_eq!(error.to_string(), "Dam factor cannot be negative.\n[line 2]");
}

#[test]
fn dam_level_never_negative() {
    let src = "river A = day * 3\n\
               dam A adjust 4 / (1 + damLevel)\n\
               river B = 1\n\
               dam B adjust damLevel + 2";

    for rainfall in [0.0, 0.5, 20.0] {
        let simulation = simulate(src, 7, rainfall);

        for (name, river) in simulation.rivers().iter() {
            assert!(river.dam_level() >= 0.0, "{name} went negative");
        }
    }
}

#[test]
fn dam_level_accumulates_across_days() {
    let simulation = simulate("river A = 4\ndam A close", 3, 1.0);

    assert_eq!(simulation.rivers().get("A").unwrap().dam_level(), 15.0);
}

#[test]
fn repeated_flow_accumulates() {
    let simulation = simulate("river A = 6\nflow A -> B\nflow A -> B", 1, 0.0);
    let b = simulation.rivers().get("B").unwrap();

    assert_eq!(b.incoming_flow(), 12.0);
}

#[test]
fn flow_reads_source_at_execution_time() {
    let simulation = simulate("river A = 6\nflow A -> B\ndam A adjust 0.5\nflow A -> B", 1, 0.0);

    assert_eq!(simulation.rivers().get("B").unwrap().incoming_flow(), 9.0);
}

#[test]
fn flow_creates_unknown_rivers() {
    let simulation = simulate("flow Ghost -> Sink", 1, 1.0);

    assert!(simulation.rivers().contains("Ghost"));
    assert_eq!(simulation.rivers().get("Sink").unwrap().incoming_flow(), 0.0);
}

#[test]
fn days_reset_transient_state() {
    let src = "river A = 5\nriver B\nflow A -> B\ncombine C = A + B\noutput A\noutput B\noutput C";
    let out = program_output(src, 2.0).unwrap();

    let config = SimulationConfig::new(4, 2.0).unwrap();
    let mut full = Vec::new();
    run_program(src, &config, &mut full).unwrap();
    let full = String::from_utf8(full).unwrap();

    for line in out.lines() {
        assert_eq!(full.matches(line).count(), 4, "{line} was not repeated every day");
    }
}

#[test]
fn combine_sums_sources() {
    assert_prints("river A = 1.25\nriver B = 2\ncombine C = A + B\noutput C", "C flow: 3.25 L/s\n");
}

#[test]
fn rivers_are_listed_in_order_of_first_use() {
    let simulation = simulate("output Z\nriver A = 1\nflow M -> A", 1, 1.0);
    let names: Vec<_> = simulation.rivers().iter().map(|(name, _)| name).collect();

    assert_eq!(names, ["Z", "A", "M"]);
}

#[test]
fn undefined_variable_aborts_day() {
    let config = SimulationConfig::new(2, 1.0).unwrap();
    let mut out = Vec::new();
    let result = run_program("print 1\nprint z\nprint 2", &config, &mut out);

    assert!(matches!(result, Err(Error::Runtime(RuntimeError::UndefinedVariable { ref name, line: 2 })) if name == "z"));
    assert_eq!(String::from_utf8(out).unwrap(),
               "\n=== Day 1 of 2 with 1.0 mm rainfall ===\n1\n");
}

#[test]
fn river_names_evaluate_to_flow() {
    assert_prints("river A = 4\ndam A adjust 0.25\nprint A", "1\n");
    assert_prints("river A = 4\nprint A * 2 + rainfall", "9\n");
}

#[test]
fn variables_and_scopes() {
    assert_prints("var x = 1\n{\n  var x = 2\n  print x\n}\nprint x", "2\n1\n");
    assert_prints("var x\nprint x", "nil\n");
    assert_prints("var a = 1; var a = a + 1; print a", "2\n");
    assert_failure("{ var inner = 1 }\nprint inner");
}

#[test]
fn arithmetic_and_stringification() {
    assert_prints("print 1 + 2 * 3", "7\n");
    assert_prints("print (1 + 2) * 3", "9\n");
    assert_prints("print 10 / 4", "2.5\n");
    assert_prints("print 8 - 3 - 2", "3\n");
    assert_prints("print -(2)", "-2\n");
    assert_prints("print \"Rhi\" + \"ne\"", "Rhine\n");
    assert_prints("print day", "1\n");
}

#[test]
fn comparisons_and_logic() {
    assert_prints("print 2 < 3\nprint 3 <= 2\nprint 2 >= 2\nprint 3 > 2", "true\nfalse\ntrue\ntrue\n");
    assert_prints("print 1 == 1\nprint nil == nil\nprint nil == false\nprint \"a\" != \"b\"",
                  "true\ntrue\nfalse\ntrue\n");
    assert_prints("print !nil\nprint !0\nprint !\"\"", "true\nfalse\nfalse\n");
    assert_prints("print nil or \"default\"\nprint 1 and 2\nprint false and z", "default\n2\nfalse\n");
}

#[test]
fn type_errors() {
    let error = runtime_error("print 1 + \"a\"");
    assert_eq!(error.to_string(), "Operands must be two numbers or two strings.\n[line 1]");

    let error = runtime_error("print \"a\" < 2");
    assert_eq!(error.to_string(), "Operands must be numbers.\n[line 1]");

    let error = runtime_error("print -\"a\"");
    assert_eq!(error.to_string(), "Operand must be a number.\n[line 1]");

    assert_failure("river A = nil");
    assert_failure("river A = 1\ndam A adjust true");
}

#[test]
fn comments_and_terminators() {
    assert_success("// nothing here\n\n\n");
    assert_success("river A = 1 // trailing\n/* spanning\nlines */ output A");
    assert_success("river A = 1; river B = 2; flow A -> B");
    assert_success("{ river A = 1 } output A");
}

#[test]
fn syntax_errors_are_collected() {
    let errors = parse_errors("river = 1\nriver A = 2\nflow A B\ndam A shut\n{ print }\n");

    let lines: Vec<_> = errors.iter().map(ParseError::line).collect();
    assert_eq!(lines, [1, 3, 4, 5]);
    assert_eq!(errors[0].to_string(), "[line 1] Error at '=': Expected river name after 'river'.");
    assert_eq!(errors[1].to_string(), "[line 3] Error at 'B': Expected '->' after source river.");
    assert_eq!(errors[3].to_string(), "[line 5] Error at '}': Expected expression.");
}

#[test]
fn lexical_errors_prevent_evaluation() {
    let errors = parse_errors("print 1\nprint 2 #\nprint \"open");

    assert_eq!(errors.len(), 3);
    assert!(errors[..2].iter().all(ParseError::is_lexical));
    assert_eq!(errors[0].to_string(), "[line 2] Error: Unexpected character '#'.");
    assert_eq!(errors[1].to_string(), "[line 3] Error: Unterminated string.");
    assert_eq!(errors[2].to_string(), "[line 3] Error at end: Expected expression.");
}

#[test]
fn numbers_print_without_exponent() {
    assert_prints("print 100000000000000000000000", "100000000000000000000000\n");
    assert_prints("print 1 / 10000", "0.0001\n");
    assert_prints("print 10 / 4\nprint 20 / 2", "2.5\n10\n");
}

#[test]
fn unclosed_block_comment_is_reported() {
    let errors = parse_errors("print 1\nprint 2 /* open\nstill open");

    assert_eq!(errors.len(), 1);
    assert!(errors[0].is_lexical());
    assert_eq!(errors[0].to_string(), "[line 2] Error: Unterminated comment.");

    let errors = parse_errors("print 1 /* open");
    assert_eq!(errors[0].to_string(), "[line 1] Error: Unterminated comment.");
}

#[test]
fn statements_print_as_trees() {
    let source = "river A = 10\n\
                  river B\n\
                  output A\n\
                  combine X = A + B\n\
                  flow A -> B\n\
                  dam A open\n\
                  dam B close\n\
                  dam A adjust inflow * 0.5\n\
                  var x = -(1 + 2)\n\
                  var y\n\
                  print \"hi\" and !nil\n\
                  x == 3;\n\
                  { print x\nprint y }";
    let program = wflow::parse_program(source).unwrap_or_else(|e| panic!("{e:?}"));
    let printed: Vec<String> = program.iter().map(ToString::to_string).collect();

    assert_eq!(printed,
               ["(river A = 10.0)",
                "(river B)",
                "(output A)",
                "(combine X = A + B)",
                "(flow A -> B)",
                "(dam A open)",
                "(dam B close)",
                "(dam A adjust (* inflow 0.5))",
                "(var x (- (group (+ 1.0 2.0))))",
                "(var y)",
                "(print (and hi (! nil)))",
                "(; (== x 3.0))",
                "(block (print x) (print y))"]);
}

#[test]
fn statement_end_is_required() {
    let errors = parse_errors("print 1 2");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "[line 1] Error at '2': Expected end of statement.");
}

#[test]
fn unclosed_block_reports_at_end() {
    let errors = parse_errors("{\nprint 1\n");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "[line 3] Error at end: Expected '}' after block.");
}
