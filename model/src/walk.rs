//! Depth-first navigation over the activity tree.

use crate::{Activity, ActivityKind, EventHandlers, FaultHandler, Process};

fn push_faults<'a>(out: &mut Vec<&'a Activity>, faults: &'a FaultHandler) {
    out.extend(faults.catches.iter().map(|c| &c.activity));
    if let Some(all) = &faults.catch_all {
        out.push(&all.activity);
    }
}

fn push_events<'a>(out: &mut Vec<&'a Activity>, events: &'a EventHandlers) {
    out.extend(events.on_events.iter().map(|e| &e.activity));
    out.extend(events.on_alarms.iter().map(|a| &a.activity));
}

impl Activity {
    /// Directly nested activities, handlers included, in document order.
    pub fn children(&self) -> Vec<&Activity> {
        let mut out = Vec::new();
        match &self.kind {
            ActivityKind::Invoke(invoke) => {
                out.extend(invoke.catches.iter().map(|c| &c.activity));
                if let Some(all) = &invoke.catch_all {
                    out.push(&all.activity);
                }
                if let Some(comp) = &invoke.compensation_handler {
                    out.push(&comp.activity);
                }
            }
            ActivityKind::Flow(flow) => out.extend(flow.activities.iter()),
            ActivityKind::Switch(switch) => out.extend(switch.cases.iter().map(|c| &c.activity)),
            ActivityKind::While(body) | ActivityKind::RepeatUntil(body) => {
                out.push(body.activity.as_ref())
            }
            ActivityKind::Sequence(seq) => out.extend(seq.activities.iter()),
            ActivityKind::Pick(pick) => {
                out.extend(pick.on_messages.iter().map(|m| &m.activity));
                out.extend(pick.on_alarms.iter().map(|a| &a.activity));
            }
            ActivityKind::Scope(scope) => {
                if let Some(faults) = &scope.fault_handler {
                    push_faults(&mut out, faults);
                }
                if let Some(comp) = &scope.compensation_handler {
                    out.push(&comp.activity);
                }
                if let Some(term) = &scope.termination_handler {
                    out.push(&term.activity);
                }
                if let Some(events) = &scope.event_handlers {
                    push_events(&mut out, events);
                }
                out.push(&scope.activity);
            }
            ActivityKind::ForEach(for_each) => out.push(&for_each.scope),
            _ => {}
        }
        out
    }

    /// Find the first activity named `name` in this subtree, self included.
    pub fn find(&self, name: &str) -> Option<&Activity> {
        if self.name() == Some(name) {
            return Some(self);
        }
        self.children().into_iter().find_map(|c| c.find(name))
    }

    /// Visit every activity in this subtree, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Activity)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

impl Process {
    /// Top-level activities: the main activity and the process handlers.
    pub fn root_activities(&self) -> Vec<&Activity> {
        let mut out = vec![&self.activity];
        if let Some(faults) = &self.fault_handler {
            push_faults(&mut out, faults);
        }
        if let Some(comp) = &self.compensation_handler {
            out.push(&comp.activity);
        }
        if let Some(term) = &self.termination_handler {
            out.push(&term.activity);
        }
        if let Some(events) = &self.event_handlers {
            push_events(&mut out, events);
        }
        out
    }

    pub fn find_activity(&self, name: &str) -> Option<&Activity> {
        self.root_activities()
            .into_iter()
            .find_map(|a| a.find(name))
    }

    /// Count of every activity in the process, handlers included.
    pub fn activity_count(&self) -> usize {
        let mut count = 0;
        for root in self.root_activities() {
            root.walk(&mut |_| count += 1);
        }
        count
    }
}
