//! Per-frame application of queued navigation steps.
//!
//! The scheduler is the only writer of the view stack once a flow is
//! running. Steps are applied strictly in issue order, and at most one
//! stack mutation happens per frame.

use crate::error::PresentError;
use crate::game::library::Library;
use crate::models::settings::Settings;
use crate::navigation::context::NavigationContext;
use crate::navigation::stack::ExitOutcome;
use crate::navigation::view::View;
use crate::system::bus::{NavigationBus, NavigationEvent};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationStep {
    Push(View),
    Exit,
    ClearFilter,
    /// Exit views until a presentation host is current.
    UnwindToHost,
    /// Exit views until only the root remains.
    UnwindToRoot,
    /// Move the current replay loader into gameplay.
    StartReplay,
}

/// Shared resources read while applying a frame.
pub struct FrameEnv<'a> {
    pub library: &'a Library,
    pub settings: &'a Settings,
    pub bus: &'a NavigationBus,
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: VecDeque<NavigationStep>,
    frame: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, step: NavigationStep) {
        log::trace!("SCHED: Queued {:?}", step);
        self.pending.push_back(step);
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Frames run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Runs one frame: applies queued steps until one mutates the stack,
    /// then refreshes the current song select if nothing moved.
    pub fn run_frame(
        &mut self,
        ctx: &mut NavigationContext,
        env: &FrameEnv<'_>,
    ) -> Result<(), PresentError> {
        self.frame += 1;

        let mut moved = false;
        while !moved {
            let Some(step) = self.pending.pop_front() else {
                break;
            };
            moved = self.apply(step, ctx, env)?;
        }

        if !moved {
            refresh_song_select(ctx, env);
        }
        Ok(())
    }

    /// Applies one step. Returns whether the stack changed.
    fn apply(
        &mut self,
        step: NavigationStep,
        ctx: &mut NavigationContext,
        env: &FrameEnv<'_>,
    ) -> Result<bool, PresentError> {
        match step {
            NavigationStep::Push(view) => {
                let kind = view.kind();
                let token = ctx.stack.push(view);
                env.bus.publish(NavigationEvent::Pushed { kind, token });
                Ok(true)
            }
            NavigationStep::Exit => exit_current(ctx, env),
            NavigationStep::ClearFilter => {
                if let Some(query) = ctx.clear_filter() {
                    log::info!("SCHED: Cleared song select filter '{}'", query);
                    env.bus.publish(NavigationEvent::FilterCleared { query });
                }
                Ok(false)
            }
            NavigationStep::UnwindToHost => {
                let current = ctx.current().ok_or(PresentError::StackUnderflow)?;
                if current.kind().hosts_presentation() {
                    return Ok(false);
                }
                self.pending.push_front(NavigationStep::UnwindToHost);
                exit_current(ctx, env)
            }
            NavigationStep::UnwindToRoot => {
                if ctx.stack.is_empty() {
                    return Err(PresentError::StackUnderflow);
                }
                if ctx.stack.len() == 1 {
                    return Ok(false);
                }
                self.pending.push_front(NavigationStep::UnwindToRoot);
                exit_current(ctx, env)
            }
            NavigationStep::StartReplay => {
                let current = ctx.current().ok_or(PresentError::StackUnderflow)?;
                let gameplay = match &current.view {
                    View::ReplayLoader { score, replay } => View::Gameplay {
                        score: score.clone(),
                        replay: replay.clone(),
                    },
                    other => {
                        log::warn!("SCHED: Cannot start replay from {}", other.kind());
                        return Ok(false);
                    }
                };
                self.apply(NavigationStep::Push(gameplay), ctx, env)
            }
        }
    }
}

fn exit_current(ctx: &mut NavigationContext, env: &FrameEnv<'_>) -> Result<bool, PresentError> {
    match ctx.stack.exit() {
        ExitOutcome::Exited(instance) => {
            env.bus.publish(NavigationEvent::Exited {
                kind: instance.kind(),
                token: instance.token,
            });
            Ok(true)
        }
        ExitOutcome::RootRetained => {
            log::warn!("SCHED: Exit requested on root view, ignoring");
            env.bus.publish(NavigationEvent::RootExitIgnored);
            Ok(false)
        }
        ExitOutcome::Empty => Err(PresentError::StackUnderflow),
    }
}

/// Populates the current song select carousel when it is stale.
fn refresh_song_select(ctx: &mut NavigationContext, env: &FrameEnv<'_>) {
    let revision = ctx.revision();
    let needs_refresh = matches!(
        ctx.current().map(|c| &c.view),
        Some(View::SongSelect(state)) if !state.items_presented || state.revision != revision
    );
    if !needs_refresh {
        return;
    }

    let visible = env.library.visible_beatmaps(
        ctx.ruleset(),
        env.settings.show_converted_beatmaps,
        ctx.filter(),
    );

    let selected = match ctx.selected_beatmap() {
        Some(id) if visible.contains(&id) => Some(id),
        _ => visible.first().copied(),
    };
    ctx.select_beatmap(selected);

    let Some(current) = ctx.stack.current_mut() else {
        return;
    };
    let token = current.token;
    if let View::SongSelect(state) = &mut current.view {
        state.visible_beatmaps = visible;
        state.items_presented = true;
        state.revision = revision;
        log::debug!(
            "SCHED: Song select {} lists {} beatmaps",
            token,
            state.visible_beatmaps.len()
        );
        env.bus.publish(NavigationEvent::ItemsPresented {
            token,
            count: state.visible_beatmaps.len(),
        });
    }
}
