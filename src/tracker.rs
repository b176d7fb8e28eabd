//! Chat command combo detection.
//!
//! [`ComboTracker`] watches channel messages whose first word is one of a
//! configured set of `!commands`. Every hit restarts a quiet-period timer
//! for that channel and command. When the timer fires, the tracker reports
//! a combo if enough distinct users joined in, then ignores the command in
//! that channel until a cooldown has passed.
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//! use slirc_hooks::tracker::{ComboConfig, ComboTracker};
//! use slirc_hooks::{Message, Router, TimerTable};
//!
//! let table = TimerTable::new();
//! let sent = Arc::new(Mutex::new(Vec::new()));
//! let outbox = Arc::clone(&sent);
//! let config = ComboConfig {
//!     threshold: 2,
//!     ..ComboConfig::new(["!quack"])
//! };
//! let tracker = ComboTracker::new(config, table.clone(), move |msg: Message| {
//!     outbox.lock().unwrap().push(msg.to_wire());
//! });
//!
//! let mut router = Router::new();
//! tracker.install(&mut router).unwrap();
//! for nick in ["a", "b"] {
//!     let line = format!(":{nick}!{nick}@h PRIVMSG #pond :!quack");
//!     router.route("net", "net,irc_raw_in_PRIVMSG", &line);
//! }
//!
//! table.advance(Duration::from_secs(20));
//! assert_eq!(*sent.lock().unwrap(), vec!["PRIVMSG #pond :2 !quack combo!\r\n"]);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::Result;
use crate::matcher::Matcher;
use crate::message::Message;
use crate::router::{Handler, RouteResult, Router};
use crate::schedule::{CancelHandle, Scheduler};

/// Where combo announcements go.
pub type Sink = Arc<dyn Fn(Message) + Send + Sync>;

/// Settings for a [`ComboTracker`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComboConfig {
    /// Commands to track, including the leading `!`.
    pub commands: Vec<String>,
    /// Silence after the last hit before the combo is scored.
    pub quiet_period: Duration,
    /// Distinct users needed for a combo.
    pub threshold: usize,
    /// How long a command is ignored after a reported combo.
    pub cooldown: Duration,
}

impl ComboConfig {
    /// Default timings for the given commands.
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ComboConfig {
            commands: commands.into_iter().map(Into::into).collect(),
            ..ComboConfig::default()
        }
    }
}

impl Default for ComboConfig {
    fn default() -> Self {
        ComboConfig {
            commands: Vec::new(),
            quiet_period: Duration::from_secs(20),
            threshold: 10,
            cooldown: Duration::from_secs(600),
        }
    }
}

#[derive(Default)]
struct Combo {
    users: HashSet<String>,
    quiet: Option<CancelHandle>,
    cooling_down: bool,
    generation: u64,
}

type Key = (String, String);

struct Shared<S> {
    config: ComboConfig,
    scheduler: S,
    sink: Sink,
    combos: Mutex<HashMap<Key, Combo>>,
}

/// Counts distinct users piling onto a chat command.
///
/// Cheap to clone; clones share state. The scheduler must not run
/// callbacks from inside [`Scheduler::schedule`].
pub struct ComboTracker<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for ComboTracker<S> {
    fn clone(&self) -> Self {
        ComboTracker {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S> fmt::Debug for ComboTracker<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComboTracker")
            .field("config", &self.shared.config)
            .finish()
    }
}

impl<S> ComboTracker<S>
where
    S: Scheduler + Send + Sync + 'static,
{
    /// Create a tracker announcing combos through `sink`.
    pub fn new<F>(config: ComboConfig, scheduler: S, sink: F) -> Self
    where
        F: Fn(Message) + Send + Sync + 'static,
    {
        ComboTracker {
            shared: Arc::new(Shared {
                config,
                scheduler,
                sink: Arc::new(sink),
                combos: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// The tracker's settings.
    pub fn config(&self) -> &ComboConfig {
        &self.shared.config
    }

    /// Route channel PRIVMSGs starting with `!` to this tracker.
    pub fn install(&self, router: &mut Router) -> Result<()> {
        router.register(
            "PRIVMSG",
            vec![Some(Matcher::glob("#*")?), Some(Matcher::glob("!*")?)],
            self.clone(),
        )
    }

    /// Record that `user` sent `command` in `channel`.
    ///
    /// Returns `false` when the command is not tracked or is cooling down.
    pub fn touch(&self, channel: &str, command: &str, user: &str) -> bool {
        if !self.shared.config.commands.iter().any(|c| c == command) {
            return false;
        }

        let key = (channel.to_owned(), command.to_owned());
        let mut combos = lock(&self.shared.combos);
        let combo = combos.entry(key.clone()).or_default();
        if combo.cooling_down {
            return false;
        }

        combo.users.insert(user.to_owned());
        combo.generation += 1;
        if let Some(quiet) = combo.quiet.take() {
            quiet.cancel();
        }

        let tracker = self.clone();
        let generation = combo.generation;
        combo.quiet = Some(self.shared.scheduler.schedule(
            self.shared.config.quiet_period,
            Box::new(move || tracker.score(key, generation)),
        ));
        true
    }

    /// Distinct users counted so far for `command` in `channel`.
    pub fn participants(&self, channel: &str, command: &str) -> usize {
        lock(&self.shared.combos)
            .get(&(channel.to_owned(), command.to_owned()))
            .map_or(0, |combo| combo.users.len())
    }

    /// Whether `command` is being ignored in `channel` after a combo.
    pub fn is_cooling_down(&self, channel: &str, command: &str) -> bool {
        lock(&self.shared.combos)
            .get(&(channel.to_owned(), command.to_owned()))
            .is_some_and(|combo| combo.cooling_down)
    }

    fn score(&self, key: Key, generation: u64) {
        let announcement = {
            let mut combos = lock(&self.shared.combos);
            let Some(combo) = combos.get_mut(&key) else {
                return;
            };
            if combo.generation != generation {
                return;
            }

            let uniq = combo.users.len();
            combo.users.clear();
            combo.quiet = None;
            debug!(channel = %key.0, command = %key.1, uniq, "combo ended");

            if uniq < self.shared.config.threshold {
                return;
            }

            combo.cooling_down = true;
            let tracker = self.clone();
            let cooled = key.clone();
            self.shared.scheduler.schedule(
                self.shared.config.cooldown,
                Box::new(move || tracker.end_cooldown(&cooled)),
            );
            Message::privmsg(key.0.as_str(), format!("{} {} combo!", uniq, key.1))
        };

        info!(channel = %key.0, command = %key.1, "combo reported");
        (self.shared.sink)(announcement);
    }

    fn end_cooldown(&self, key: &Key) {
        if let Some(combo) = lock(&self.shared.combos).get_mut(key) {
            combo.cooling_down = false;
        }
    }
}

impl<S> Handler for ComboTracker<S>
where
    S: Scheduler + Send + Sync + 'static,
{
    fn handle(&self, _server: &str, msg: &Message) -> RouteResult {
        let (Some(channel), Some(text)) = (msg.target(), msg.text()) else {
            return RouteResult::Continue;
        };
        let Some(user) = msg.nick().or(msg.display_name.as_deref()) else {
            return RouteResult::Continue;
        };
        let command = text.split(' ').next().unwrap_or_default();

        self.touch(channel, command, user);
        RouteResult::Continue
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::TimerTable;

    fn tracker(table: &TimerTable) -> (ComboTracker<TimerTable>, Arc<Mutex<Vec<Message>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let outbox = Arc::clone(&sent);
        let config = ComboConfig {
            threshold: 3,
            ..ComboConfig::new(["!quack", "!speen"])
        };
        let tracker = ComboTracker::new(config, table.clone(), move |msg: Message| {
            outbox.lock().unwrap().push(msg);
        });
        (tracker, sent)
    }

    #[test]
    fn test_defaults() {
        let config = ComboConfig::default();
        assert_eq!(config.quiet_period, Duration::from_secs(20));
        assert_eq!(config.threshold, 10);
        assert_eq!(config.cooldown, Duration::from_secs(600));
    }

    #[test]
    fn test_reports_combo_and_cools_down() {
        let table = TimerTable::new();
        let (tracker, sent) = tracker(&table);

        for user in ["a", "b", "c", "a"] {
            assert!(tracker.touch("#pond", "!quack", user));
        }
        assert_eq!(tracker.participants("#pond", "!quack"), 3);

        table.advance(Duration::from_secs(20));
        {
            let sent = sent.lock().unwrap();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].target(), Some("#pond"));
            assert_eq!(sent[0].text(), Some("3 !quack combo!"));
        }
        assert!(tracker.is_cooling_down("#pond", "!quack"));
        assert!(!tracker.touch("#pond", "!quack", "d"));
        assert!(tracker.touch("#other", "!quack", "d"));

        table.advance(Duration::from_secs(600));
        assert!(!tracker.is_cooling_down("#pond", "!quack"));
        assert!(tracker.touch("#pond", "!quack", "d"));
    }

    #[test]
    fn test_below_threshold_resets() {
        let table = TimerTable::new();
        let (tracker, sent) = tracker(&table);

        tracker.touch("#pond", "!speen", "a");
        tracker.touch("#pond", "!speen", "b");
        table.advance(Duration::from_secs(20));

        assert!(sent.lock().unwrap().is_empty());
        assert_eq!(tracker.participants("#pond", "!speen"), 0);
        assert!(!tracker.is_cooling_down("#pond", "!speen"));
    }

    #[test]
    fn test_each_hit_restarts_quiet_period() {
        let table = TimerTable::new();
        let (tracker, sent) = tracker(&table);

        tracker.touch("#pond", "!quack", "a");
        table.advance(Duration::from_secs(15));
        tracker.touch("#pond", "!quack", "b");
        table.advance(Duration::from_secs(15));
        tracker.touch("#pond", "!quack", "c");
        table.advance(Duration::from_secs(19));
        assert!(sent.lock().unwrap().is_empty());
        assert_eq!(table.pending(), 1);

        table.advance(Duration::from_secs(1));
        assert_eq!(sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_untracked_command_ignored() {
        let table = TimerTable::new();
        let (tracker, _) = tracker(&table);
        assert!(!tracker.touch("#pond", "!croak", "a"));
        assert_eq!(table.pending(), 0);
    }

    #[test]
    fn test_handler_reads_first_word() {
        let table = TimerTable::new();
        let (tracker, _) = tracker(&table);
        let mut router = Router::new();
        tracker.install(&mut router).unwrap();

        let signal = "net,irc_raw_in_PRIVMSG";
        router.route("net", signal, ":a!a@h PRIVMSG #pond :!quack quack");
        router.route("net", signal, ":b!b@h PRIVMSG #pond :!quackers");
        router.route("net", signal, ":c!c@h PRIVMSG me :!quack");
        assert_eq!(tracker.participants("#pond", "!quack"), 1);
        assert_eq!(tracker.participants("me", "!quack"), 0);
    }
}
