//! The space flow's complete list of legal moves.
//!
//! Composite states are entered from `space` or `spaceDetail` only and
//! remember which of the two to return to. Teardown rows (`leftSpace`,
//! `finish`, `dismiss`) only start from leaves; the coordinator collapses
//! any live child before firing them.

use super::host::SpaceFlowHost;
use super::state::{LeafState, SpaceFlowEvent, SpaceFlowPayload, SpaceFlowState};
use spaceflow_flow::{Destination, EventPattern, StatePattern, TransitionRow, TransitionTable};
use std::sync::{Arc, LazyLock};

pub(crate) type SpaceFlowTable =
    TransitionTable<SpaceFlowState, SpaceFlowEvent, SpaceFlowPayload, SpaceFlowHost>;

type Row = TransitionRow<SpaceFlowState, SpaceFlowEvent, SpaceFlowPayload, SpaceFlowHost>;

pub(crate) static SPACE_FLOW_TABLE: LazyLock<Arc<SpaceFlowTable>> =
    LazyLock::new(|| Arc::new(build()));

const BROWSING: StatePattern<SpaceFlowState> =
    StatePattern::new(&["space", "spaceDetail"], SpaceFlowState::is_browsing);

const SHOWING_SCREEN: StatePattern<SpaceFlowState> = StatePattern::new(
    &["space", "spaceDetail", "joinSpace"],
    |s: &SpaceFlowState| {
        matches!(
            s,
            SpaceFlowState::Space | SpaceFlowState::SpaceDetail | SpaceFlowState::JoinSpace
        )
    },
);

/// The leaf a composite state started from. Source patterns only admit
/// `space` and `spaceDetail`.
fn browsing_leaf(state: &SpaceFlowState) -> LeafState {
    match state {
        SpaceFlowState::SpaceDetail => LeafState::SpaceDetail,
        _ => LeafState::Space,
    }
}

fn back_to_previous(state: &SpaceFlowState, _: &SpaceFlowEvent) -> SpaceFlowState {
    match state.previous() {
        Some(leaf) => leaf.into(),
        None => state.clone(),
    }
}

fn stop_row(
    label: &'static str,
    source: StatePattern<SpaceFlowState>,
    event: EventPattern<SpaceFlowEvent>,
) -> Row {
    TransitionRow::new(
        label,
        source,
        event,
        Destination::new("<previous>", back_to_previous),
    )
    .effect(SpaceFlowHost::stop_child)
}

fn build() -> SpaceFlowTable {
    TransitionTable::new("SpaceFlow")
        .row(
            TransitionRow::new(
                "start",
                StatePattern::new(&["initial"], |s: &SpaceFlowState| {
                    matches!(s, SpaceFlowState::Initial)
                }),
                EventPattern::new("start", |e: &SpaceFlowEvent| {
                    matches!(e, SpaceFlowEvent::Start)
                }),
                Destination::new("space", |_: &SpaceFlowState, _: &SpaceFlowEvent| {
                    SpaceFlowState::Space
                }),
            )
            .effect(SpaceFlowHost::present_space),
        )
        .row(
            TransitionRow::new(
                "startUnjoined",
                StatePattern::new(&["initial"], |s: &SpaceFlowState| {
                    matches!(s, SpaceFlowState::Initial)
                }),
                EventPattern::new("startUnjoined", |e: &SpaceFlowEvent| {
                    matches!(e, SpaceFlowEvent::StartUnjoined)
                }),
                Destination::new("joinSpace", |_: &SpaceFlowState, _: &SpaceFlowEvent| {
                    SpaceFlowState::JoinSpace
                }),
            )
            .effect(SpaceFlowHost::present_join_space),
        )
        .row(
            TransitionRow::new(
                "joinedSpace",
                StatePattern::new(&["initial", "joinSpace"], |s: &SpaceFlowState| {
                    matches!(s, SpaceFlowState::Initial | SpaceFlowState::JoinSpace)
                }),
                EventPattern::new("joinedSpace", |e: &SpaceFlowEvent| {
                    matches!(e, SpaceFlowEvent::JoinedSpace { .. })
                }),
                Destination::new(
                    "<space|spaceDetail>",
                    |_: &SpaceFlowState, e: &SpaceFlowEvent| match e {
                        SpaceFlowEvent::JoinedSpace {
                            show_confirmation: true,
                        } => SpaceFlowState::SpaceDetail,
                        _ => SpaceFlowState::Space,
                    },
                ),
            )
            .effect(SpaceFlowHost::present_joined_space),
        )
        .row(
            TransitionRow::new(
                "startChildFlow",
                BROWSING,
                EventPattern::new("startChildFlow", |e: &SpaceFlowEvent| {
                    matches!(e, SpaceFlowEvent::StartChildFlow(_))
                }),
                Destination::new(
                    "presentingChild",
                    |s: &SpaceFlowState, e: &SpaceFlowEvent| match e {
                        SpaceFlowEvent::StartChildFlow(child) => SpaceFlowState::PresentingChild {
                            child: child.clone(),
                            previous: browsing_leaf(s),
                        },
                        _ => s.clone(),
                    },
                ),
            )
            .requires_payload()
            .effect(SpaceFlowHost::start_child_flow),
        )
        .row(stop_row(
            "stopChildFlow",
            StatePattern::new(&["presentingChild"], |s: &SpaceFlowState| {
                matches!(s, SpaceFlowState::PresentingChild { .. })
            }),
            EventPattern::new("stopChildFlow", |e: &SpaceFlowEvent| {
                matches!(e, SpaceFlowEvent::StopChildFlow)
            }),
        ))
        .row(
            TransitionRow::new(
                "startRoomFlow",
                BROWSING,
                EventPattern::new("startRoomFlow", |e: &SpaceFlowEvent| {
                    matches!(e, SpaceFlowEvent::StartRoomFlow(_))
                }),
                Destination::new(
                    "roomFlow",
                    |s: &SpaceFlowState, e: &SpaceFlowEvent| match e {
                        SpaceFlowEvent::StartRoomFlow(room) => SpaceFlowState::RoomFlow {
                            room: room.clone(),
                            previous: browsing_leaf(s),
                        },
                        _ => s.clone(),
                    },
                ),
            )
            .effect(SpaceFlowHost::start_room_flow),
        )
        .row(stop_row(
            "stopRoomFlow",
            StatePattern::new(&["roomFlow"], |s: &SpaceFlowState| {
                matches!(s, SpaceFlowState::RoomFlow { .. })
            }),
            EventPattern::new("stopRoomFlow", |e: &SpaceFlowEvent| {
                matches!(e, SpaceFlowEvent::StopRoomFlow)
            }),
        ))
        .row(
            TransitionRow::new(
                "startMembersFlow",
                BROWSING,
                EventPattern::new("startMembersFlow", |e: &SpaceFlowEvent| {
                    matches!(e, SpaceFlowEvent::StartMembersFlow)
                }),
                Destination::new("membersFlow", |s: &SpaceFlowState, _: &SpaceFlowEvent| {
                    SpaceFlowState::MembersFlow {
                        previous: browsing_leaf(s),
                    }
                }),
            )
            .requires_payload()
            .effect(SpaceFlowHost::start_members_flow),
        )
        .row(stop_row(
            "stopMembersFlow",
            StatePattern::new(&["membersFlow"], |s: &SpaceFlowState| {
                matches!(s, SpaceFlowState::MembersFlow { .. })
            }),
            EventPattern::new("stopMembersFlow", |e: &SpaceFlowEvent| {
                matches!(e, SpaceFlowEvent::StopMembersFlow)
            }),
        ))
        .row(
            TransitionRow::new(
                "startSettingsFlow",
                BROWSING,
                EventPattern::new("startSettingsFlow", |e: &SpaceFlowEvent| {
                    matches!(e, SpaceFlowEvent::StartSettingsFlow)
                }),
                Destination::new("settingsFlow", |s: &SpaceFlowState, _: &SpaceFlowEvent| {
                    SpaceFlowState::SettingsFlow {
                        previous: browsing_leaf(s),
                    }
                }),
            )
            .effect(SpaceFlowHost::start_settings_flow),
        )
        .row(stop_row(
            "stopSettingsFlow",
            StatePattern::new(&["settingsFlow"], |s: &SpaceFlowState| {
                matches!(s, SpaceFlowState::SettingsFlow { .. })
            }),
            EventPattern::new("stopSettingsFlow", |e: &SpaceFlowEvent| {
                matches!(e, SpaceFlowEvent::StopSettingsFlow)
            }),
        ))
        .row(
            TransitionRow::new(
                "startRolesFlow",
                BROWSING,
                EventPattern::new("startRolesFlow", |e: &SpaceFlowEvent| {
                    matches!(e, SpaceFlowEvent::StartRolesFlow)
                }),
                Destination::new("rolesFlow", |s: &SpaceFlowState, _: &SpaceFlowEvent| {
                    SpaceFlowState::RolesFlow {
                        previous: browsing_leaf(s),
                    }
                }),
            )
            .effect(SpaceFlowHost::start_roles_flow),
        )
        .row(stop_row(
            "stopRolesFlow",
            StatePattern::new(&["rolesFlow"], |s: &SpaceFlowState| {
                matches!(s, SpaceFlowState::RolesFlow { .. })
            }),
            EventPattern::new("stopRolesFlow", |e: &SpaceFlowEvent| {
                matches!(e, SpaceFlowEvent::StopRolesFlow)
            }),
        ))
        .row(
            TransitionRow::new(
                "leftSpace",
                SHOWING_SCREEN,
                EventPattern::new("leftSpace", |e: &SpaceFlowEvent| {
                    matches!(e, SpaceFlowEvent::LeftSpace)
                }),
                Destination::new("leftSpace", |_: &SpaceFlowState, _: &SpaceFlowEvent| {
                    SpaceFlowState::LeftSpace
                }),
            )
            .effect(SpaceFlowHost::did_leave_space),
        )
        .row(
            TransitionRow::new(
                "finish",
                SHOWING_SCREEN,
                EventPattern::new("finish", |e: &SpaceFlowEvent| {
                    matches!(e, SpaceFlowEvent::Finish)
                }),
                Destination::new("dismissed", |_: &SpaceFlowState, _: &SpaceFlowEvent| {
                    SpaceFlowState::Dismissed
                }),
            )
            .effect(SpaceFlowHost::did_finish),
        )
        .row(
            TransitionRow::new(
                "dismiss",
                StatePattern::new(
                    &["initial", "space", "spaceDetail", "joinSpace"],
                    |s: &SpaceFlowState| s.leaf().is_some(),
                ),
                EventPattern::new("dismiss", |e: &SpaceFlowEvent| {
                    matches!(e, SpaceFlowEvent::Dismiss)
                }),
                Destination::new("dismissed", |_: &SpaceFlowState, _: &SpaceFlowEvent| {
                    SpaceFlowState::Dismissed
                }),
            )
            .effect(SpaceFlowHost::dismiss),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schematic_lists_every_row() {
        let schematic = SPACE_FLOW_TABLE.schematic();
        assert_eq!(schematic.name, "SpaceFlow");
        let sources: usize = SPACE_FLOW_TABLE
            .rows()
            .iter()
            .map(|row| row.source().labels().len())
            .sum();
        assert_eq!(schematic.edges.len(), sources);

        let from_space: Vec<_> = schematic
            .edges_from("space")
            .map(|e| e.row.as_str())
            .collect();
        assert_eq!(
            from_space,
            vec![
                "startChildFlow",
                "startRoomFlow",
                "startMembersFlow",
                "startSettingsFlow",
                "startRolesFlow",
                "leftSpace",
                "finish",
                "dismiss",
            ]
        );
    }

    #[test]
    fn test_composites_only_entered_from_browsing_leaves() {
        let composite_starts = [
            "startChildFlow",
            "startRoomFlow",
            "startMembersFlow",
            "startSettingsFlow",
            "startRolesFlow",
        ];
        for row in SPACE_FLOW_TABLE.rows() {
            if composite_starts.contains(&row.label()) {
                assert_eq!(row.source().labels(), &["space", "spaceDetail"]);
            }
        }
    }
}
