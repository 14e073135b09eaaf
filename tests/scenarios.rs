use verum::{Derivation, Direction, OwnedPath, ParseError, Path, RuleEngine, Substitution, parse};

#[test]
fn rewriting_a_formula_step_by_step() {
    let engine = RuleEngine::new();
    let mut derivation = Derivation::new(parse("a /\\ (b \\/ !a)").unwrap());

    let steps = [
        ("distributivity-and-over-or", vec![]),
        ("complement-and", vec![1]),
        ("identity-or-bottom", vec![]),
    ];
    for (id, position) in steps {
        let rule = engine.find_rule(id).unwrap();
        let position = OwnedPath::from(position);
        let next = engine
            .apply_rule(
                derivation.current(),
                rule,
                Direction::LeftToRight,
                Some(position.as_path()),
                None,
            )
            .unwrap();
        derivation.record(next, rule.clone(), Direction::LeftToRight, position);
    }

    let forms: Vec<_> = std::iter::once(derivation.start())
        .chain(derivation.steps().iter().map(|step| &step.to))
        .map(|expression| expression.to_string())
        .collect();
    assert_eq!(
        forms,
        vec!["a ∧ (b ∨ ¬a)", "(a ∧ b) ∨ (a ∧ ¬a)", "(a ∧ b) ∨ ⊥", "a ∧ b"]
    );
}

#[test]
fn every_enumerated_application_can_be_performed() {
    let engine = RuleEngine::new();
    let expression = parse("(p → q) ∧ ¬(q ∨ ⊥)").unwrap();

    for application in engine.all_possible_applications(&expression) {
        let result = engine
            .apply_application(&expression, &application, None)
            .unwrap();
        assert_eq!(result.to_string(), application.full_preview);
        // Every result is itself parseable back into the same tree
        assert_eq!(parse(&application.full_preview).unwrap(), result);
    }
}

#[test]
fn instantiating_introduced_variables() {
    let engine = RuleEngine::new();
    let rule = engine.find_rule("absorption-and").unwrap();
    let introduced = engine.detect_new_variables(rule, Direction::RightToLeft);
    assert_eq!(introduced.keys().map(String::as_str).collect::<Vec<_>>(), vec!["B"]);

    let instantiations: Substitution = introduced
        .into_keys()
        .map(|name| (name, parse("c").unwrap()))
        .collect();
    let result = engine
        .apply_rule(
            &parse("a ∧ b").unwrap(),
            rule,
            Direction::RightToLeft,
            Some(Path::new(&[])),
            Some(&instantiations),
        )
        .unwrap();
    assert_eq!(result.to_string(), "(a ∧ b) ∧ ((a ∧ b) ∨ c)");
}

#[test]
fn greek_and_ascii_variables() {
    let engine = RuleEngine::new();
    let expression = parse("¬(φ ∧ ?x)").unwrap();
    let rule = engine.find_rule("de-morgan-and").unwrap();

    let result = engine
        .apply_rule(&expression, rule, Direction::LeftToRight, None, None)
        .unwrap();
    assert_eq!(result.to_string(), "¬φ ∨ ¬?x");
}

#[test]
fn syntax_errors() {
    assert!(matches!(
        parse("a & b"),
        Err(ParseError::UnknownCharacter { character: '&', offset: 2 })
    ));
    assert_eq!(parse("a ∧"), Err(ParseError::UnexpectedEnd));
    assert_eq!(parse("(a ∨ b"), Err(ParseError::MissingClosingParenthesis));
    assert!(matches!(parse("a b"), Err(ParseError::TrailingTokens(_))));
}

#[test]
fn custom_catalog_from_json() {
    let path = std::env::temp_dir().join(format!("verum-scenario-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{
            "rules": [
                {
                    "id": "export-import",
                    "name": "Exportation",
                    "description": "(𝜑 ∧ 𝜓) → 𝜒 ≡ 𝜑 → (𝜓 → 𝜒)",
                    "category": "implication",
                    "leftPattern": "(A ∧ B) → C",
                    "rightPattern": "A → (B → C)",
                    "variables": ["A", "B", "C"]
                }
            ]
        }"#,
    )
    .unwrap();

    let engine = RuleEngine::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(engine.rules().len(), 1);
    let applications = engine.all_possible_applications(&parse("(p ∧ q) → r").unwrap());
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0].full_preview, "p → (q → r)");
    assert_eq!(applications[0].description, "(p ∧ q) → r → p → (q → r)");
}
