//! WS-BPEL 2.0 working-draft documents.

use bpel_tests::prelude::*;

mod approval {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("approval")
            .fixture("draft/approval.bpel")
            .expect(|e| {
                e.clean()
                    .dialect(Dialect::Bpel20Draft)
                    .activity("receiveRequest", "receive")
                    .activity("route", "switch")
                    .activity("notify", "switch")
                    .activity("poll", "while")
                    .activity("sendNotice", "empty")
                    .activity("skipNotice", "empty")
            })
    }

    #[test]
    fn test_draft_parses_cleanly() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_switch_cases_keep_order() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();

        let ActivityKind::Switch(route) = &parsed.process.find_activity("route").unwrap().kind else {
            panic!("not a switch");
        };
        let names: Vec<_> = route.cases.iter().map(|c| c.activity.name()).collect();
        assert_eq!(names, vec![Some("escalate"), Some("review"), Some("autoApprove")]);
        assert!(route.cases[0].condition.as_ref().unwrap().text.contains("500"));
        assert!(route.otherwise().is_some());
    }

    #[test]
    fn test_then_branch() {
        let parsed = Runner::new(&scenario()).unwrap().parse().unwrap();

        let ActivityKind::Switch(notify) = &parsed.process.find_activity("notify").unwrap().kind
        else {
            panic!("not a switch");
        };
        assert_eq!(notify.cases.len(), 2);
        assert_eq!(
            notify.cases[0].condition.as_ref().map(|c| c.text.as_str()),
            Some("$request.notify")
        );
        assert_eq!(notify.cases[0].activity.name(), Some("sendNotice"));
        assert_eq!(notify.otherwise().unwrap().activity.name(), Some("skipNotice"));
    }
}

mod dialect_names {
    use super::*;

    const DRAFT_WITH_EXIT: &str = r#"<process name="p" targetNamespace="urn:t"
    xmlns="http://schemas.xmlsoap.org/ws/2004/03/business-process/">
  <sequence>
    <exit name="leave"/>
  </sequence>
</process>"#;

    #[test]
    fn test_draft_accepts_exit() {
        Scenario::new("draft-exit")
            .source(DRAFT_WITH_EXIT)
            .expect(|e| e.clean().activity("leave", "exit"))
            .run()
            .unwrap();
    }

    const FINAL_WITH_SWITCH: &str = r#"<process name="p" targetNamespace="urn:t"
    xmlns="http://docs.oasis-open.org/wsbpel/2.0/process/executable">
  <sequence>
    <switch name="old">
      <otherwise><empty/></otherwise>
    </switch>
    <empty name="after"/>
  </sequence>
</process>"#;

    #[test]
    fn test_final_standard_rejects_switch() {
        Scenario::new("final-switch")
            .source(FINAL_WITH_SWITCH)
            .expect(|e| {
                e.ok()
                    .errors(1)
                    .diagnostic_at(DiagnosticKey::UnexpectedElement, 4)
                    .activity("after", "empty")
            })
            .run()
            .unwrap();
    }
}
