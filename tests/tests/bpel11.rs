//! BPEL4WS 1.1 documents.

use bpel_tests::prelude::*;

mod loan {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("loan")
            .fixture("bpel11/loan.bpel")
            .expect(|e| {
                e.clean()
                    .dialect(Dialect::Bpel11)
                    .activity("main", "flow")
                    .activity("receive1", "receive")
                    .activity("invokeApprover", "invoke")
                    .activity("reply", "reply")
                    .activity("undoAll", "compensate")
                    .activity("stop", "exit")
                    .activity_count(6)
            })
    }

    #[test]
    fn test_loan_parses_cleanly() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_link_attributes() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();
        let process = &parsed.process;

        assert_eq!(process.suppress_join_failure, Some(true));

        let receive = process.find_activity("receive1").unwrap();
        assert_eq!(receive.sources.len(), 1);
        assert_eq!(receive.sources[0].link_name, "receive-to-approval");
        assert!(receive.sources[0]
            .transition_condition
            .as_ref()
            .unwrap()
            .text
            .contains(">= 10000"));

        let invoke = process.find_activity("invokeApprover").unwrap();
        assert_eq!(invoke.targets[0].link_name, "receive-to-approval");
        assert_eq!(invoke.sources[0].link_name, "approval-to-reply");
    }

    #[test]
    fn test_partners_group_partner_links() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();

        assert_eq!(parsed.process.partners.len(), 1);
        assert_eq!(parsed.process.partners[0].name, "bank");
        assert_eq!(parsed.process.partners[0].partner_links, vec!["approver".to_string()]);
    }

    #[test]
    fn test_port_type_is_resolved() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();

        let ActivityKind::Invoke(invoke) = &parsed.process.find_activity("invokeApprover").unwrap().kind
        else {
            panic!("not an invoke");
        };
        let port_type = invoke.port_type.as_ref().unwrap();
        assert_eq!(port_type.namespace, "urn:example:loan");
        assert_eq!(port_type.local, "loanApprovalPT");
    }
}

mod shipping {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("shipping")
            .fixture("bpel11/shipping.bpel")
            .expect(|e| {
                e.clean()
                    .activity("start", "pick")
                    .activity("accepted", "empty")
                    .activity("expired", "exit")
                    .activity("init", "assign")
                    .activity("mode", "switch")
                    .activity("shipAll", "scope")
                    .activity("shipEverything", "invoke")
                    .activity("shipLoop", "while")
                    .activity("pause", "wait")
                    .activity_count(11)
            })
    }

    #[test]
    fn test_shipping_parses_cleanly() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_attribute_expressions() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();
        let process = &parsed.process;

        let ActivityKind::While(body) = &process.find_activity("shipLoop").unwrap().kind else {
            panic!("not a while");
        };
        assert!(body.condition.text.contains("itemsShipped"));

        let ActivityKind::Wait(wait) = &process.find_activity("pause").unwrap().kind else {
            panic!("not a wait");
        };
        assert!(matches!(&wait.timing, Some(AlarmTiming::For(e)) if e.text == "'PT1H'"));

        let ActivityKind::Switch(switch) = &process.find_activity("mode").unwrap().kind else {
            panic!("not a switch");
        };
        assert_eq!(switch.cases.len(), 2);
        assert!(switch.cases[0].condition.is_some());
        assert!(switch.otherwise().is_some());
    }

    #[test]
    fn test_pick_branches() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();

        let ActivityKind::Pick(pick) = &parsed.process.find_activity("start").unwrap().kind else {
            panic!("not a pick");
        };
        assert!(pick.create_instance);
        assert_eq!(pick.on_messages.len(), 1);
        assert_eq!(pick.on_messages[0].correlations[0].initiate, Initiate::Yes);
        assert_eq!(
            pick.on_messages[0].correlations[0].pattern,
            Some(CorrelationPattern::In)
        );
        assert_eq!(pick.on_alarms.len(), 1);
        assert!(matches!(pick.on_alarms[0].timing, Some(AlarmTiming::For(_))));
    }

    #[test]
    fn test_inline_literal_and_expression_copies() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();

        let ActivityKind::Assign(assign) = &parsed.process.find_activity("init").unwrap().kind else {
            panic!("not an assign");
        };
        assert_eq!(assign.copies.len(), 2);
        match &assign.copies[0].from {
            ValueRef::Literal(literal) => {
                assert_eq!(literal.element.name.namespace, BPEL20_NS);
                let item = literal.element.child_elements().next().unwrap();
                assert_eq!(item.name.local, "count");
                assert_eq!(item.text(), "0");
            }
            other => panic!("unexpected from {:?}", other),
        }
        assert!(matches!(&assign.copies[1].from, ValueRef::Expression(e) if e.text == "0"));
        assert_eq!(assign.copies[1].to, ValueRef::variable("itemsShipped"));
    }

    #[test]
    fn test_serializable_scope_with_catch_all() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();

        let ActivityKind::Scope(scope) = &parsed.process.find_activity("shipAll").unwrap().kind else {
            panic!("not a scope");
        };
        assert!(scope.isolated);
        let faults = scope.fault_handler.as_ref().unwrap();
        assert!(faults.catches.is_empty());
        assert_eq!(faults.catch_all.as_ref().unwrap().activity.name(), Some("ignore"));
    }
}
