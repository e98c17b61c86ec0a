//! Cross-cutting guarantees of the front end.

use bpel_tests::prelude::*;

const BPEL20: &str = "http://docs.oasis-open.org/wsbpel/2.0/process/executable";
const BPEL11: &str = "http://schemas.xmlsoap.org/ws/2003/03/business-process/";

/// A process in `namespace` whose main activity is `body`.
fn document(namespace: &str, body: &str) -> String {
    format!(
        r#"<process name="p" targetNamespace="urn:t" xmlns="{}"
    xmlns:tns="urn:t" xmlns:ext="urn:ext">
{}
</process>"#,
        namespace, body
    )
}

fn parse(source: &str) -> Result<Parsed, ParseFailure> {
    Grammar::new().unwrap().parse(source, &ParseOptions::default())
}

fn parse_ok(source: &str) -> Parsed {
    match parse(source) {
        Ok(parsed) => parsed,
        Err(failure) => panic!("parse failed: {:?}", failure.diagnostics),
    }
}

fn first_copy(process: &Process) -> &AssignCopy {
    let mut found = None;
    for root in process.root_activities() {
        root.walk(&mut |a| {
            if let ActivityKind::Assign(assign) = &a.kind {
                if found.is_none() {
                    found = assign.copies.first();
                }
            }
        });
    }
    found.expect("document has a copy")
}

// ==================== Determinism ====================

mod determinism {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_fixtures() -> Vec<String> {
        let mut all = Vec::new();
        for dir in ["bpel11", "bpel20", "draft"] {
            all.extend(fixtures_in(dir).unwrap());
        }
        all
    }

    #[test]
    fn test_same_document_same_model() {
        let grammar = Grammar::new().unwrap();
        let options = ParseOptions::default().understand("urn:example:required");

        for fixture in valid_fixtures() {
            let source = load_fixture(&fixture).unwrap();
            let first = grammar.parse(&source, &options).unwrap();
            let second = grammar.parse(&source, &options).unwrap();
            let fresh = Grammar::new().unwrap().parse(&source, &options).unwrap();

            assert_eq!(first.process, second.process, "{}", fixture);
            assert_eq!(first.diagnostics, second.diagnostics, "{}", fixture);
            assert_eq!(first.process, fresh.process, "{}", fixture);
        }
    }

    #[test]
    fn test_shared_grammar_across_threads() {
        let grammar = Grammar::new().unwrap();
        let source = load_fixture("bpel20/purchase.bpel").unwrap();
        let expected = grammar.parse(&source, &ParseOptions::default()).unwrap().process;

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| grammar.parse(&source, &ParseOptions::default()).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap().process, expected);
            }
        });
    }
}

// ==================== Value references ====================

mod value_reference {
    use super::*;
    use pretty_assertions::assert_eq;

    fn copy_with(from: &str) -> Result<Parsed, ParseFailure> {
        parse(&document(
            BPEL20,
            &format!(r#"<assign><copy>{}<to variable="b"/></copy></assign>"#, from),
        ))
    }

    fn from_of(from: &str) -> ValueRef {
        let parsed = copy_with(from).unwrap();
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        first_copy(&parsed.process).from.clone()
    }

    fn rejected(from: &str) -> Vec<String> {
        let parsed = copy_with(from).unwrap();
        let d = parsed
            .diagnostics
            .with_key(DiagnosticKey::InvalidAttributeCombination)
            .next()
            .unwrap_or_else(|| panic!("{} was accepted", from));
        d.args.clone()
    }

    #[test]
    fn test_variable_form() {
        assert_eq!(
            from_of(r#"<from variable="a" part="p"/>"#),
            ValueRef::Variable {
                variable: "a".into(),
                part: Some("p".into()),
                query: None,
            }
        );
    }

    #[test]
    fn test_property_form() {
        match from_of(r#"<from variable="a" property="tns:prop"/>"#) {
            ValueRef::Property { variable, property } => {
                assert_eq!(variable, "a");
                assert_eq!(property.namespace, "urn:t");
                assert_eq!(property.local, "prop");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_partner_link_form() {
        assert_eq!(
            from_of(r#"<from partnerLink="pl" endpointReference="myRole"/>"#),
            ValueRef::PartnerLink {
                partner_link: "pl".into(),
                endpoint_reference: Some(EndpointReference::MyRole),
            }
        );
    }

    #[test]
    fn test_inline_forms() {
        assert!(matches!(
            from_of(r#"<from><literal>x</literal></from>"#),
            ValueRef::Literal(l) if l.text() == "x"
        ));
        assert!(matches!(
            from_of(r#"<from>$a + 1</from>"#),
            ValueRef::Expression(e) if e.text == "$a + 1"
        ));
    }

    #[test]
    fn test_two_forms_at_once_are_rejected() {
        assert_eq!(
            rejected(r#"<from variable="a" partnerLink="pl"/>"#),
            vec!["partnerLink".to_string(), "variable".to_string()]
        );
        rejected(r#"<from variable="a" part="p" property="tns:prop"/>"#);
    }

    #[test]
    fn test_named_attribute_without_a_form_is_rejected() {
        // A stray form attribute never falls through to inline content.
        rejected(r#"<from part="p"/>"#);
        rejected(r#"<from endpointReference="myRole"/>"#);
    }

    #[test]
    fn test_bpel11_value_attributes_are_rejected_in_bpel20() {
        assert_eq!(rejected(r#"<from expression="$a + 1"/>"#), vec!["expression".to_string()]);
        assert_eq!(rejected(r#"<from opaque="yes"/>"#), vec!["opaque".to_string()]);
    }

    #[test]
    fn test_rejected_copy_is_dropped() {
        let parsed = copy_with(r#"<from variable="a" partnerLink="pl"/>"#).unwrap();

        let ActivityKind::Assign(assign) = &parsed.process.activity.kind else {
            panic!("not an assign");
        };
        assert!(assign.copies.is_empty());
        // The copy was present, so only the bad combination is reported.
        let keys: Vec<DiagnosticKey> = parsed.diagnostics.iter().map(|d| d.key).collect();
        assert_eq!(keys, vec![DiagnosticKey::InvalidAttributeCombination]);
    }

    #[test]
    fn test_assign_without_copy_is_reported() {
        let parsed = parse_ok(&document(BPEL20, "<assign/>"));

        let keys: Vec<DiagnosticKey> = parsed.diagnostics.iter().map(|d| d.key).collect();
        assert_eq!(keys, vec![DiagnosticKey::MissingRequiredChild]);
        assert_eq!(parsed.diagnostics.iter().next().unwrap().args, vec!["copy".to_string()]);
    }

    #[test]
    fn test_assign_copy_end_to_end() {
        let parsed = parse_ok(&document(
            BPEL20,
            r#"<assign><copy><from variable="a"/><to variable="b"/></copy></assign>"#,
        ));

        let ActivityKind::Assign(assign) = &parsed.process.activity.kind else {
            panic!("not an assign");
        };
        assert_eq!(assign.copies.len(), 1);
        assert_eq!(assign.copies[0].from, ValueRef::variable("a"));
        assert_eq!(assign.copies[0].to, ValueRef::variable("b"));
    }
}

// ==================== Literals across dialects ====================

mod literals {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inline_and_wrapped_literals_are_equal() {
        let old = parse_ok(&document(
            BPEL11,
            r#"<assign><copy>
  <from><tns:item code="7">5</tns:item></from>
  <to variable="b"/>
</copy></assign>"#,
        ));
        let new = parse_ok(&document(
            BPEL20,
            r#"<assign><copy>
  <from><literal>
    <tns:item code="7">5</tns:item>
  </literal></from>
  <to variable="b"/>
</copy></assign>"#,
        ));

        let ValueRef::Literal(old) = &first_copy(&old.process).from else {
            panic!("1.1 from is not a literal");
        };
        let ValueRef::Literal(new) = &first_copy(&new.process).from else {
            panic!("2.0 from is not a literal");
        };
        assert_eq!(old, new);
        assert_eq!(new.element.name.namespace, BPEL20);
    }
}

// ==================== Extensibility ====================

mod extensibility {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_foreign_elements_leave_no_trace() {
        let plain = parse_ok(&document(BPEL20, r#"<sequence><empty name="e"/></sequence>"#));
        let decorated = parse_ok(&document(
            BPEL20,
            r#"<sequence>
  <ext:note><ext:deep>text</ext:deep></ext:note>
  <empty name="e"><ext:hint/></empty>
</sequence>"#,
        ));

        assert!(decorated.diagnostics.is_empty(), "{:?}", decorated.diagnostics);
        let names = |p: &Process| {
            let mut out = Vec::new();
            p.activity.walk(&mut |a| out.push((a.kind_name(), a.name().map(str::to_string))));
            out
        };
        assert_eq!(names(&plain.process), names(&decorated.process));
    }

    #[test]
    fn test_foreign_elements_in_bpel11() {
        let parsed = parse_ok(&document(
            BPEL11,
            r#"<sequence><ext:note/><empty/></sequence>"#,
        ));

        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_documentation_is_ignored_everywhere() {
        let parsed = parse_ok(&document(
            BPEL20,
            r#"<flow>
  <documentation>parallel part</documentation>
  <links><documentation>none</documentation><link name="L"/></links>
  <empty/>
</flow>"#,
        ));

        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
    }
}

// ==================== Scopes and handlers ====================

mod scopes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_alarms_and_events_stay_separate() {
        let parsed = parse_ok(&document(
            BPEL20,
            r#"<scope>
  <eventHandlers>
    <onEvent partnerLink="pl" operation="first" variable="v1"><scope><empty name="e1"/></scope></onEvent>
    <onAlarm><for>'PT1S'</for><empty name="a1"/></onAlarm>
    <onEvent partnerLink="pl" operation="second" variable="v2"><scope><empty name="e2"/></scope></onEvent>
    <onAlarm><until>'2030-01-01'</until><empty name="a2"/></onAlarm>
  </eventHandlers>
  <empty/>
</scope>"#,
        ));

        let ActivityKind::Scope(scope) = &parsed.process.activity.kind else {
            panic!("not a scope");
        };
        let events = scope.event_handlers.as_ref().unwrap();
        let operations: Vec<_> = events.on_events.iter().map(|e| e.operation.as_str()).collect();
        assert_eq!(operations, vec!["first", "second"]);
        let alarms: Vec<_> = events.on_alarms.iter().map(|a| a.activity.name()).collect();
        assert_eq!(alarms, vec![Some("a1"), Some("a2")]);
        assert!(matches!(events.on_alarms[1].timing, Some(AlarmTiming::Until(_))));
    }

    #[test]
    fn test_scope_catch_all_wraps_empty() {
        let parsed = parse_ok(&document(
            BPEL20,
            r#"<scope>
  <faultHandlers><catchAll><empty/></catchAll></faultHandlers>
  <empty/>
</scope>"#,
        ));

        let ActivityKind::Scope(scope) = &parsed.process.activity.kind else {
            panic!("not a scope");
        };
        let faults = scope.fault_handler.as_ref().unwrap();
        assert!(faults.catches.is_empty());
        assert_eq!(faults.catch_all.as_ref().unwrap().activity.kind, ActivityKind::Empty);
    }

    #[test]
    fn test_fault_handler_bodies_report_into_the_parse() {
        // GIVEN problems nested inside catch and catchAll bodies
        let parsed = parse(&document(
            BPEL20,
            r#"<scope>
  <faultHandlers>
    <catch faultName="tns:oops">
      <throw/>
    </catch>
    <catchAll>
      <wait/>
    </catchAll>
  </faultHandlers>
  <empty/>
</scope>"#,
        ))
        .unwrap();

        // THEN both are reported at their own lines and the model survives
        let lines: Vec<_> = parsed
            .diagnostics
            .iter()
            .map(|d| (d.key, d.location.line))
            .collect();
        assert_eq!(
            lines,
            vec![
                (DiagnosticKey::MissingRequiredAttribute, 6),
                (DiagnosticKey::MissingRequiredChild, 9),
            ]
        );
        let ActivityKind::Scope(scope) = &parsed.process.activity.kind else {
            panic!("not a scope");
        };
        let faults = scope.fault_handler.as_ref().unwrap();
        assert!(matches!(faults.catches[0].activity.kind, ActivityKind::Throw(_)));
        assert!(matches!(
            faults.catch_all.as_ref().unwrap().activity.kind,
            ActivityKind::Wait(Wait { timing: None })
        ));
    }
}

// ==================== Correlations ====================

mod correlations {
    use super::*;
    use pretty_assertions::assert_eq;

    fn invoke_pattern(pattern: &str) -> Result<Parsed, ParseFailure> {
        parse(&document(
            BPEL20,
            &format!(
                r#"<invoke partnerLink="pl" operation="op">
  <correlations><correlation set="c" pattern="{}"/></correlations>
</invoke>"#,
                pattern
            ),
        ))
    }

    fn pattern_of(parsed: &Parsed) -> Option<CorrelationPattern> {
        let ActivityKind::Invoke(invoke) = &parsed.process.activity.kind else {
            panic!("not an invoke");
        };
        invoke.correlations[0].pattern
    }

    #[test]
    fn test_pattern_tokens() {
        for (token, expected) in [
            ("out", CorrelationPattern::Out),
            ("request", CorrelationPattern::Out),
            ("in", CorrelationPattern::In),
            ("response", CorrelationPattern::In),
        ] {
            let parsed = invoke_pattern(token).unwrap();
            assert_eq!(pattern_of(&parsed), Some(expected), "{}", token);
            assert!(parsed.diagnostics.is_empty());
        }
    }

    #[test]
    fn test_unknown_pattern_is_fatal() {
        let failure = invoke_pattern("both").unwrap_err();

        assert!(failure.diagnostics.has_fatal());
        let d = failure
            .diagnostics
            .with_key(DiagnosticKey::MalformedInput)
            .next()
            .unwrap();
        assert_eq!(d.args, vec!["pattern".to_string(), "both".to_string()]);
    }

    #[test]
    fn test_inbound_contexts_force_in() {
        let parsed = parse_ok(&document(
            BPEL20,
            r#"<sequence>
  <receive partnerLink="pl" operation="a">
    <correlations><correlation set="c" pattern="request"/></correlations>
  </receive>
  <pick>
    <onMessage partnerLink="pl" operation="b">
      <correlations><correlation set="c" pattern="out"/></correlations>
      <empty/>
    </onMessage>
  </pick>
  <scope>
    <eventHandlers>
      <onEvent partnerLink="pl" operation="c">
        <correlations><correlation set="c" pattern="response"/></correlations>
        <scope><empty/></scope>
      </onEvent>
    </eventHandlers>
    <empty/>
  </scope>
</sequence>"#,
        ));

        // Two overrides warn; an explicit inbound pattern does not.
        assert_eq!(parsed.diagnostics.count(Severity::Warning), 2);
        assert!(!parsed.diagnostics.has_errors());

        let ActivityKind::Sequence(seq) = &parsed.process.activity.kind else {
            panic!("not a sequence");
        };
        let ActivityKind::Receive(receive) = &seq.activities[0].kind else {
            panic!("not a receive");
        };
        assert_eq!(receive.correlations[0].pattern, Some(CorrelationPattern::In));
        let ActivityKind::Pick(pick) = &seq.activities[1].kind else {
            panic!("not a pick");
        };
        assert_eq!(
            pick.on_messages[0].correlations[0].pattern,
            Some(CorrelationPattern::In)
        );
        let ActivityKind::Scope(scope) = &seq.activities[2].kind else {
            panic!("not a scope");
        };
        let on_event = &scope.event_handlers.as_ref().unwrap().on_events[0];
        assert_eq!(on_event.correlations[0].pattern, Some(CorrelationPattern::In));
    }
}

// ==================== Flows ====================

mod flows {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flow_of(body: &str) -> Flow {
        let parsed = parse_ok(&document(BPEL20, body));
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        match parsed.process.activity.kind {
            ActivityKind::Flow(flow) => flow,
            other => panic!("not a flow: {:?}", other),
        }
    }

    #[test]
    fn test_links_before_or_after_activities() {
        let before = flow_of(
            r#"<flow><links><link name="L1"/></links><invoke partnerLink="pl" operation="op"/></flow>"#,
        );
        let after = flow_of(
            r#"<flow><invoke partnerLink="pl" operation="op"/><links><link name="L1"/></links></flow>"#,
        );

        for flow in [&before, &after] {
            assert_eq!(flow.links.len(), 1);
            assert_eq!(flow.links[0].name, "L1");
            assert_eq!(flow.activities.len(), 1);
            assert_eq!(flow.activities[0].kind_name(), "invoke");
        }
    }

    #[test]
    fn test_second_links_block_is_a_duplicate() {
        let parsed = parse_ok(&document(
            BPEL20,
            r#"<flow><links><link name="A"/></links><links><link name="B"/></links><empty/></flow>"#,
        ));

        assert_eq!(
            parsed
                .diagnostics
                .with_key(DiagnosticKey::DuplicateChild)
                .count(),
            1
        );
    }
}

// ==================== Parse options ====================

mod options {
    use super::*;
    use bpel_core::{QName, QNameError};
    use bpel_parser::{QNameResolver, StartElement};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    /// Puts every prefixed name in one namespace.
    struct FixedNamespace;

    impl QNameResolver for FixedNamespace {
        fn resolve(&self, prefixed: &str, _element: &StartElement) -> Result<QName, QNameError> {
            let (_, local) = bpel_core::split_prefixed(prefixed)?;
            Ok(QName::new("urn:fixed", local))
        }
    }

    #[test]
    fn test_bpel11_conditions_use_the_process_expression_language() {
        let source = format!(
            r#"<process name="p" targetNamespace="urn:t" xmlns="{}"
    expressionLanguage="urn:lang">
  <while condition="true()"><empty/></while>
</process>"#,
            BPEL11
        );

        let parsed = parse_ok(&source);

        let ActivityKind::While(looped) = &parsed.process.activity.kind else {
            panic!("not a while");
        };
        assert_eq!(looped.condition.text, "true()");
        assert_eq!(looped.condition.language.as_deref(), Some("urn:lang"));
    }

    #[test]
    fn test_base_uri_is_recorded_on_the_process() {
        let options = ParseOptions::default().with_base_uri("file:///defs/order.bpel");
        let parsed = Grammar::new()
            .unwrap()
            .parse(&document(BPEL20, "<empty/>"), &options)
            .unwrap();

        assert_eq!(parsed.process.base_uri.as_deref(), Some("file:///defs/order.bpel"));
        assert_eq!(parse_ok(&document(BPEL20, "<empty/>")).process.base_uri, None);
    }

    #[test]
    fn test_custom_resolver_is_consulted() {
        // GIVEN a fault name whose prefix is not bound in the document
        let source = document(BPEL20, r#"<throw faultName="nowhere:oops"/>"#);

        // WHEN parsed with the default resolver, then with a custom one
        let unresolved = parse_ok(&source);
        let options = ParseOptions::default().with_resolver(Arc::new(FixedNamespace));
        let resolved = Grammar::new().unwrap().parse(&source, &options).unwrap();

        // THEN only the default reports the prefix
        assert_eq!(
            unresolved
                .diagnostics
                .with_key(DiagnosticKey::NamespacePrefixUnresolved)
                .count(),
            1
        );
        assert!(resolved.diagnostics.is_empty(), "{:?}", resolved.diagnostics);
        let ActivityKind::Throw(throw) = &resolved.process.activity.kind else {
            panic!("not a throw");
        };
        assert_eq!(throw.fault_name, Some(QName::new("urn:fixed", "oops")));
    }
}

// ==================== Character data ====================

mod content {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stray_text_is_reported_at_its_own_line() {
        // GIVEN words inside a sequence, two lines below its start tag
        let source = document(
            BPEL20,
            "<sequence>\n  <empty/>\n  stray words\n</sequence>",
        );

        // WHEN parsed
        let parsed = parse_ok(&source);

        // THEN the error names the text's line and the enclosing element
        let d = parsed
            .diagnostics
            .with_key(DiagnosticKey::UnexpectedContent)
            .next()
            .unwrap();
        assert_eq!(d.location.line, 5);
        assert_eq!(d.location.element, "sequence");
        assert_eq!(d.args, vec!["stray words".to_string()]);
    }
}
