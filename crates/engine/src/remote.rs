//! Out-of-process solver bridge.
//!
//! [`ChannelSolver`] forwards each decision to whatever task owns the
//! receiving end of a bounded channel (an inference worker, a socket handler)
//! and awaits the reply. A dropped peer degrades to the first offered move so
//! the game always advances.

use std::future::Future;

use log::warn;
use tokio::sync::{mpsc, oneshot};

use crate::solver::{AsyncSolver, SolverContext};
use crate::types::Move;

/// One pending decision.
#[derive(Debug)]
pub struct MoveRequest {
    pub context: SolverContext,
    pub reply: oneshot::Sender<Move>,
}

impl MoveRequest {
    /// Answer the request. Returns false if the game side has gone away.
    pub fn respond(self, mv: Move) -> bool {
        self.reply.send(mv).is_ok()
    }
}

/// Async solver backed by a request channel.
#[derive(Debug, Clone)]
pub struct ChannelSolver {
    tx: mpsc::Sender<MoveRequest>,
}

impl ChannelSolver {
    pub fn new(tx: mpsc::Sender<MoveRequest>) -> Self {
        Self { tx }
    }

    /// Create a solver and the receiver its requests arrive on.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<MoveRequest>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, rx)
    }
}

impl AsyncSolver for ChannelSolver {
    fn choose_move(&mut self, ctx: &SolverContext) -> impl Future<Output = Move> + Send {
        let tx = self.tx.clone();
        let context = ctx.clone();

        async move {
            let fallback = context.fallback_move();
            let (reply, answer) = oneshot::channel();

            if tx.send(MoveRequest { context, reply }).await.is_err() {
                warn!("solver channel closed, playing first valid move");
                return fallback;
            }
            match answer.await {
                Ok(mv) => mv,
                Err(_) => {
                    warn!("solver dropped a move request, playing first valid move");
                    fallback
                }
            }
        }
    }
}
