//! WS-BPEL 2.0 documents.

use bpel_tests::prelude::*;

mod purchase {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("purchase")
            .fixture("bpel20/purchase.bpel")
            .expect(|e| {
                e.clean()
                    .dialect(Dialect::Bpel20)
                    .activity("main", "sequence")
                    .activity("receiveOrder", "receive")
                    .activity("fulfil", "flow")
                    .activity("ship", "invoke")
                    .activity("prepareInvoice", "assign")
                    .activity("checkTotal", "switch")
                    .activity("review", "wait")
                    .activity("standard", "empty")
                    .activity("small", "empty")
                    .activity("replyInvoice", "reply")
                    .activity("replyFault", "reply")
                    .activity("bail", "exit")
                    .activity_count(12)
            })
    }

    #[test]
    fn test_purchase_parses_cleanly() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_purchase_declarations() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();
        let process = &parsed.process;

        assert_eq!(process.name, "purchase");
        assert_eq!(process.target_namespace, "urn:example:purchase");
        assert_eq!(process.imports.len(), 1);
        assert_eq!(process.imports[0].location.as_deref(), Some("purchase.wsdl"));
        assert_eq!(process.partner_links.len(), 2);
        assert_eq!(
            process.partner_link("shipper").and_then(|p| p.partner_role.as_deref()),
            Some("shipper")
        );
        assert_eq!(process.correlation_sets[0].properties.len(), 1);

        // The inline initializer is a literal.
        let attempts = process.variable("attempts").unwrap();
        match &attempts.initializer {
            Some(ValueRef::Literal(literal)) => assert_eq!(literal.text(), "0"),
            other => panic!("unexpected initializer {:?}", other),
        }
    }

    #[test]
    fn test_purchase_links_and_copy() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();
        let process = &parsed.process;

        let ActivityKind::Flow(flow) = &process.find_activity("fulfil").unwrap().kind else {
            panic!("fulfil is not a flow");
        };
        assert_eq!(flow.links.len(), 1);
        assert_eq!(flow.links[0].name, "shipToInvoice");

        let ship = process.find_activity("ship").unwrap();
        assert_eq!(ship.sources.len(), 1);
        let condition = ship.sources[0].transition_condition.as_ref().unwrap();
        assert_eq!(condition.text, "$attempts < 3");

        let prepare = process.find_activity("prepareInvoice").unwrap();
        assert_eq!(prepare.targets[0].link_name, "shipToInvoice");
        let ActivityKind::Assign(assign) = &prepare.kind else {
            panic!("prepareInvoice is not an assign");
        };
        match &assign.copies[0].from {
            ValueRef::Variable {
                variable,
                part,
                query,
            } => {
                assert_eq!(variable, "order");
                assert_eq!(part.as_deref(), Some("payload"));
                assert_eq!(query.as_ref().unwrap().text, "/tns:order/tns:total");
            }
            other => panic!("unexpected from {:?}", other),
        }
    }

    #[test]
    fn test_if_becomes_switch_with_trailing_otherwise() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();

        let check = parsed.process.find_activity("checkTotal").unwrap();
        let ActivityKind::Switch(switch) = &check.kind else {
            panic!("checkTotal is not a switch");
        };
        assert_eq!(switch.cases.len(), 3);
        assert!(switch.cases[0].condition.is_some());
        assert!(switch.cases[1].condition.is_some());
        assert_eq!(switch.otherwise().unwrap().activity.name(), Some("small"));
    }

    #[test]
    fn test_process_fault_handler() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();

        let faults = parsed.process.fault_handler.as_ref().unwrap();
        assert_eq!(faults.catches.len(), 1);
        assert_eq!(faults.catches[0].fault_variable.as_deref(), Some("reason"));
        assert_eq!(
            faults.catches[0].fault_name.as_ref().map(|q| q.local.as_str()),
            Some("cannotComplete")
        );
        assert_eq!(faults.catch_all.as_ref().unwrap().activity.kind, ActivityKind::Exit);
    }
}

mod events {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("events")
            .fixture("bpel20/events.bpel")
            .expect(|e| {
                e.clean()
                    .activity("session", "scope")
                    .activity("cancelScope", "scope")
                    .activity("each", "forEach")
                    .activity("iteration", "scope")
                    .activity("retry", "repeatUntil")
                    .activity_count(12)
            })
    }

    #[test]
    fn test_events_parse_cleanly() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_scope_sections() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();

        let ActivityKind::Scope(scope) = &parsed.process.activity.kind else {
            panic!("main activity is not a scope");
        };
        assert!(scope.isolated);
        assert_eq!(scope.variables.len(), 1);
        assert!(matches!(scope.variables[0].ty, Some(VariableType::Element(_))));
        assert_eq!(
            scope.termination_handler.as_ref().unwrap().activity.name(),
            Some("terminated")
        );
        assert_eq!(
            scope.compensation_handler.as_ref().unwrap().activity.name(),
            Some("undo")
        );
    }

    #[test]
    fn test_for_each_counters_and_completion() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();

        let ActivityKind::ForEach(for_each) = &parsed.process.find_activity("each").unwrap().kind
        else {
            panic!("each is not a forEach");
        };
        assert_eq!(for_each.counter_name, "i");
        assert!(!for_each.parallel);
        assert_eq!(for_each.start_counter.text, "1");
        assert_eq!(for_each.final_counter.text, "3");
        let branches = for_each
            .completion_condition
            .as_ref()
            .and_then(|c| c.branches.as_ref())
            .unwrap();
        assert!(branches.successful_branches_only);
        assert_eq!(branches.expression.text, "2");
        assert_eq!(for_each.scope.name(), Some("iteration"));
    }
}

mod extensions {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("extensions")
            .fixture("bpel20/extensions.bpel")
            .expect(|e| e.clean().activity("main", "sequence").activity("done", "empty"))
    }

    #[test]
    fn test_foreign_content_is_silent() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_extension_activity_and_attributes_kept() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();
        let process = &parsed.process;

        assert_eq!(process.extensions.len(), 1);
        assert!(!process.extensions[0].must_understand);
        assert_eq!(process.extension_attributes.len(), 1);
        assert_eq!(process.extension_attributes[0].value, "ops");

        let ActivityKind::Sequence(main) = &process.activity.kind else {
            panic!("main is not a sequence");
        };
        // The vendor annotation leaves no trace; the extension activity does.
        assert_eq!(main.activities.len(), 2);
        let ActivityKind::Extension(ext) = &main.activities[0].kind else {
            panic!("first child is not an extension activity");
        };
        assert_eq!(ext.element.name.local, "audit");
        assert_eq!(ext.element.name.namespace, "urn:example:vendor");
        assert_eq!(ext.element.child_elements().count(), 1);
        assert_eq!(process.activity.extension_attributes[0].value, "on");
    }
}

mod must_understand {
    use super::*;

    #[test]
    fn test_unknown_required_extension_aborts() {
        Scenario::new("must-understand")
            .fixture("bpel20/must-understand.bpel")
            .expect(|e| e.fails().diagnostic(DiagnosticKey::UnsupportedConstruct))
            .run()
            .unwrap();
    }

    #[test]
    fn test_understood_extension_is_accepted() {
        Scenario::new("must-understand-ok")
            .fixture("bpel20/must-understand.bpel")
            .understand("urn:example:required")
            .expect(|e| e.clean().activity("only", "empty"))
            .run()
            .unwrap();
    }
}
