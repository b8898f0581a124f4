//! Intent - interactions and child actions turned into folder actions.

use crate::stream::Stream;
use crate::types::{Action, ActionKind, NodeId};

/// Merge a folder's inputs into its action stream:
///
/// - anything on `add` becomes `AddChild` from this folder
/// - anything on `remove` becomes `RemoveSelf` from this folder
/// - a child's `RemoveSelf` becomes `RemoveChild` from that child
///
/// Anything else a child emits stays with the child.
pub fn intent<A, R>(
    self_id: &NodeId,
    add: &Stream<A>,
    remove: &Stream<R>,
    child_actions: &Stream<Action>,
) -> Stream<Action>
where
    A: Clone + 'static,
    R: Clone + 'static,
{
    let adder = self_id.clone();
    let remover = self_id.clone();

    Stream::merge(vec![
        add.map(move |_| Action::add_child(adder.clone())),
        remove.map(move |_| Action::remove_self(remover.clone())),
        child_actions
            .filter(|action| action.kind == ActionKind::RemoveSelf)
            .map(Action::retagged),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Scope;
    use crate::state::{Interaction, InteractionKind};
    use crate::stream::Subject;
    use crate::stream::testing::Recorder;

    fn click() -> Interaction {
        Interaction {
            scope: Scope::root(&NodeId::from("root")),
            selector: "add".into(),
            kind: InteractionKind::Click,
        }
    }

    #[test]
    fn test_interactions_become_actions() {
        let me = NodeId::from("f1");
        let add = Subject::new();
        let remove = Subject::new();
        let children: Subject<Action> = Subject::new();
        let actions = intent(&me, &add.stream(), &remove.stream(), &children.stream());
        let recorder = Recorder::attach(&actions);

        add.next(click());
        remove.next(click());

        assert_eq!(
            recorder.values(),
            vec![Action::add_child(me.clone()), Action::remove_self(me.clone())]
        );
    }

    #[test]
    fn test_child_removal_is_retagged() {
        let me = NodeId::from("f1");
        let child = NodeId::from("f2");
        let children: Subject<Action> = Subject::new();
        let actions = intent(&me, &Stream::<()>::never(), &Stream::<()>::never(), &children.stream());
        let recorder = Recorder::attach(&actions);

        children.next(Action::remove_self(child.clone()));
        children.next(Action::add_child(child.clone()));
        children.next(Action::remove_child(NodeId::from("f3")));

        assert_eq!(
            recorder.values(),
            vec![Action::remove_child(child)],
            "only RemoveSelf crosses the boundary, and only retagged"
        );
    }
}
