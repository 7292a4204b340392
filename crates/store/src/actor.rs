//! Minimal actor runtime: a task that owns a value and processes messages
//! from a bounded mailbox one at a time.

use std::{any::Any, fmt, marker::PhantomData, panic::AssertUnwindSafe};

use async_trait::async_trait;
use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};

const MAILBOX_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisionStrategy {
    /// Keep going with the next message.
    Resume,
    Stop,
}

#[async_trait]
pub trait Actor: Send + 'static {
    /// Called after a handler panicked. The panicking message is lost, the
    /// return value decides whether the actor goes on.
    /// NOTE: a panic in here stops the actor.
    #[allow(unused_variables)]
    async fn on_fail(&mut self, error: Box<dyn Any + Send>) -> SupervisionStrategy {
        SupervisionStrategy::Resume
    }
}

pub trait Message: Send + 'static {
    type Response: Send + 'static;
}

#[async_trait]
pub trait Handler<M: Message>: Actor {
    async fn handle(&mut self, message: M) -> M::Response;
}

#[async_trait]
trait Envelope<A: Actor>: Send {
    async fn deliver(self: Box<Self>, actor: &mut A);
}

struct ActorMessage<M: Message, A> {
    message: M,
    respond_to: Option<oneshot::Sender<M::Response>>,
    _actor: PhantomData<fn() -> A>,
}

#[async_trait]
impl<M, A> Envelope<A> for ActorMessage<M, A>
where
    M: Message,
    A: Handler<M>,
{
    async fn deliver(self: Box<Self>, actor: &mut A) {
        let ActorMessage {
            message,
            respond_to,
            ..
        } = *self;
        let response = actor.handle(message).await;
        if let Some(respond_to) = respond_to {
            if respond_to.send(response).is_err() {
                log::debug!("caller stopped waiting for the answer");
            }
        }
    }
}

pub enum ActorError {
    /// The actor stopped, nothing was delivered.
    Stopped,
    /// The message was taken, but no answer came back.
    NoAnswer(oneshot::error::RecvError),
}

impl fmt::Debug for ActorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "Stopped"),
            Self::NoAnswer(why) => write!(f, "NoAnswer: {:?}", why),
        }
    }
}

impl fmt::Display for ActorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "actor stopped"),
            Self::NoAnswer(why) => write!(f, "actor did not answer: {}", why),
        }
    }
}

impl std::error::Error for ActorError {}

pub struct ActorRef<A: Actor> {
    sender: mpsc::Sender<Box<dyn Envelope<A>>>,
}

impl<A: Actor> Clone for ActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<A: Actor> fmt::Debug for ActorRef<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ActorRef")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

impl<A: Actor> ActorRef<A> {
    async fn send<M>(
        &self,
        message: M,
        respond_to: Option<oneshot::Sender<M::Response>>,
    ) -> Result<(), ActorError>
    where
        M: Message,
        A: Handler<M>,
    {
        let envelope: Box<dyn Envelope<A>> = Box::new(ActorMessage {
            message,
            respond_to,
            _actor: PhantomData,
        });
        self.sender
            .send(envelope)
            .await
            .map_err(|_| ActorError::Stopped)
    }

    /// Delivers `message` without waiting for it to be handled.
    pub async fn tell<M>(&self, message: M) -> Result<(), ActorError>
    where
        M: Message,
        A: Handler<M>,
    {
        self.send(message, None).await
    }

    pub async fn ask<M>(&self, message: M) -> Result<M::Response, ActorError>
    where
        M: Message,
        A: Handler<M>,
    {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(message, Some(response_tx)).await?;
        response_rx.await.map_err(ActorError::NoAnswer)
    }
}

/// Spawns `actor` on the tokio runtime. A panicking handler is caught and
/// `Actor::on_fail` decides how to continue.
pub fn run<A: Actor>(mut actor: A) -> ActorRef<A> {
    let (sender, mut receiver) = mpsc::channel::<Box<dyn Envelope<A>>>(MAILBOX_SIZE);

    tokio::spawn(async move {
        while let Some(envelope) = receiver.recv().await {
            let result = AssertUnwindSafe(envelope.deliver(&mut actor))
                .catch_unwind()
                .await;
            if let Err(why) = result {
                log::error!("actor panicked: {:?}", why);
                if actor.on_fail(why).await == SupervisionStrategy::Stop {
                    break;
                }
            }
        }
        log::debug!("actor stopped");
    });

    ActorRef { sender }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tally {
        total: i64,
        failures: usize,
        stop_on_fail: bool,
    }

    #[async_trait]
    impl Actor for Tally {
        async fn on_fail(&mut self, _: Box<dyn Any + Send>) -> SupervisionStrategy {
            self.failures += 1;
            if self.stop_on_fail {
                SupervisionStrategy::Stop
            } else {
                SupervisionStrategy::Resume
            }
        }
    }

    struct Add(i64);

    impl Message for Add {
        type Response = i64;
    }

    #[async_trait]
    impl Handler<Add> for Tally {
        async fn handle(&mut self, message: Add) -> i64 {
            if message.0 < 0 {
                panic!("negative amount");
            }
            self.total += message.0;
            self.total
        }
    }

    struct Failures;

    impl Message for Failures {
        type Response = usize;
    }

    #[async_trait]
    impl Handler<Failures> for Tally {
        async fn handle(&mut self, _: Failures) -> usize {
            self.failures
        }
    }

    fn tally(stop_on_fail: bool) -> ActorRef<Tally> {
        run(Tally {
            total: 0,
            failures: 0,
            stop_on_fail,
        })
    }

    #[tokio::test]
    async fn messages_are_handled_in_order() {
        let actor = tally(false);
        actor.tell(Add(2)).await.unwrap();
        actor.tell(Add(3)).await.unwrap();
        assert_eq!(actor.ask(Add(5)).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn resumes_after_a_panic() {
        let actor = tally(false);
        actor.ask(Add(4)).await.unwrap();
        assert!(matches!(actor.ask(Add(-1)).await, Err(ActorError::NoAnswer(_))));
        assert_eq!(actor.ask(Failures).await.unwrap(), 1);
        assert_eq!(actor.ask(Add(1)).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn stop_strategy_ends_the_actor() {
        let actor = tally(true);
        assert!(actor.ask(Add(-1)).await.is_err());
        assert!(actor.ask(Add(1)).await.is_err());
    }
}
