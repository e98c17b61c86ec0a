//! Documents the front end must reject or report.

use bpel_tests::prelude::*;

mod roots {
    use super::*;

    #[test]
    fn test_unknown_root_namespace_is_fatal() {
        Scenario::new("unknown-root")
            .fixture("invalid/unknown-root.bpel")
            .expect(|e| {
                e.fails()
                    .diagnostic_at(DiagnosticKey::UnsupportedConstruct, 2)
                    .diagnostic_matches(r"urn:example:not-bpel")
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_abstract_process_namespace_is_fatal() {
        Scenario::new("abstract")
            .fixture("invalid/abstract.bpel")
            .expect(|e| e.fails().diagnostic(DiagnosticKey::UnsupportedConstruct))
            .run()
            .unwrap();
    }

    #[test]
    fn test_abstract_process_attribute_is_fatal() {
        Scenario::new("abstract11")
            .fixture("invalid/abstract11.bpel")
            .expect(|e| {
                e.fails()
                    .diagnostic(DiagnosticKey::UnsupportedConstruct)
                    .diagnostic_matches("abstractProcess")
            })
            .run()
            .unwrap();
    }
}

mod malformed {
    use super::*;

    #[test]
    fn test_truncated_document_fails() {
        Scenario::new("truncated")
            .fixture("invalid/truncated.bpel")
            .expect(|e| e.fails().diagnostic(DiagnosticKey::XmlSyntax))
            .run()
            .unwrap();
    }

    #[test]
    fn test_unknown_correlation_pattern_is_fatal() {
        Scenario::new("bad-pattern")
            .fixture("invalid/bad-pattern.bpel")
            .expect(|e| {
                e.fails()
                    .diagnostic_at(DiagnosticKey::MalformedInput, 7)
                    .diagnostic_matches("sideways")
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_unbound_prefix() {
        Scenario::new("unbound-prefix")
            .source(
                r#"<process name="p" targetNamespace="urn:t"
    xmlns="http://docs.oasis-open.org/wsbpel/2.0/process/executable">
  <nope:thing/>
</process>"#,
            )
            .expect(|e| e.fails().diagnostic(DiagnosticKey::NamespacePrefixUnresolved))
            .run()
            .unwrap();
    }
}

mod unknown_element {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("unknown-element")
            .fixture("invalid/unknown-element.bpel")
            .expect(|e| {
                e.ok()
                    .errors(1)
                    .warnings(0)
                    .diagnostic_at(DiagnosticKey::UnexpectedElement, 5)
                    .activity("visible", "empty")
                    .assert_fn(|p| p.find_activity("hidden").is_none())
            })
    }

    #[test]
    fn test_unknown_element_is_reported_once_and_skipped() {
        scenario().run().unwrap();
    }
}

mod several_errors {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("several-errors")
            .fixture("invalid/several-errors.bpel")
            .expect(|e| {
                e.ok()
                    .errors(3)
                    .warnings(1)
                    .diagnostic_at(DiagnosticKey::InvalidAttributeCombination, 7)
                    .diagnostic_at(DiagnosticKey::MissingRequiredChild, 5)
                    .diagnostic_at(DiagnosticKey::MissingRequiredAttribute, 13)
                    .diagnostic_at(DiagnosticKey::InvalidAttributeValue, 19)
                    .activity("inbound", "receive")
            })
    }

    #[test]
    fn test_collect_all_reports_every_problem() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_fail_fast_stops_at_first_error() {
        Scenario::new("several-errors-fast")
            .fixture("invalid/several-errors.bpel")
            .fail_fast()
            .expect(|e| {
                e.fails()
                    .errors(1)
                    .diagnostic(DiagnosticKey::InvalidAttributeCombination)
                    .no_diagnostic(DiagnosticKey::MissingRequiredAttribute)
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_inbound_correlation_forced_to_in() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();

        let ActivityKind::Receive(receive) = &parsed.process.find_activity("inbound").unwrap().kind
        else {
            panic!("not a receive");
        };
        assert_eq!(receive.correlations[0].pattern, Some(CorrelationPattern::In));
    }
}
