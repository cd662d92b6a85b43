//! Synthetic text, flags, dates and links for sample data.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Where the seeder gets its fake content from. Swap in a scripted
/// implementation to make a seed run fully deterministic.
pub trait ContentSource {
    /// About `word_count` words (varied by up to 40%), capitalised and
    /// terminated with a period.
    fn sentence(&mut self, word_count: usize) -> String;

    /// About `sentence_count` sentences joined by spaces.
    fn paragraph(&mut self, sentence_count: usize) -> String;

    /// A three-part marketing phrase, e.g. "Seamless event-driven pipeline".
    fn catch_phrase(&mut self) -> String;

    /// `true` with probability `chance_of_true`, clamped to `[0, 1]`.
    fn boolean(&mut self, chance_of_true: f64) -> bool;

    /// A moment in `[now - lookback, now]`.
    fn date_time_within(&mut self, lookback: Duration, now: DateTime<Utc>) -> DateTime<Utc>;

    fn url(&mut self) -> String;

    fn choose<'a>(&mut self, options: &[&'a str]) -> &'a str;
}

const WORDS: &[&str] = &[
    "about", "across", "after", "again", "against", "agent", "allow", "almost", "already", "always",
    "among", "animal", "answer", "anyone", "around", "article", "artist", "attention", "author",
    "available", "beautiful", "because", "before", "begin", "behind", "believe", "better",
    "between", "budget", "build", "business", "camera", "campaign", "career", "carry", "center",
    "certain", "chance", "change", "choice", "church", "citizen", "close", "coach", "collection",
    "community", "company", "concern", "consider", "contain", "continue", "country", "course",
    "cover", "create", "culture", "current", "decade", "decide", "deep", "defense", "degree",
    "design", "detail", "develop", "difference", "direction", "discover", "discussion", "early",
    "economy", "effort", "either", "energy", "enjoy", "enough", "entire", "environment", "evening",
    "event", "everything", "evidence", "example", "experience", "explain", "family", "feeling",
    "field", "figure", "final", "finally", "focus", "follow", "forward", "future", "garden",
    "general", "global", "ground", "group", "growth", "happen", "health", "history", "however",
    "idea", "image", "imagine", "important", "include", "increase", "indeed", "industry",
    "instead", "interest", "issue", "itself", "kitchen", "language", "later", "leader", "learn",
    "letter", "light", "listen", "little", "local", "machine", "maintain", "manage", "market",
    "matter", "measure", "media", "memory", "method", "middle", "minute", "model", "modern",
    "moment", "morning", "movement", "music", "nature", "network", "never", "night", "notice",
    "number", "offer", "often", "option", "order", "organization", "other", "outside", "owner",
    "paper", "parent", "particular", "pattern", "people", "perhaps", "picture", "piece", "place",
    "plant", "point", "policy", "popular", "position", "power", "practice", "prepare", "present",
    "pressure", "pretty", "process", "produce", "project", "provide", "purpose", "quality",
    "question", "quickly", "rather", "reach", "reason", "recent", "record", "reflect", "region",
    "remain", "remember", "report", "research", "resource", "result", "return", "science",
    "season", "second", "section", "series", "service", "several", "shoulder", "simple", "simply",
    "single", "situation", "skill", "small", "society", "something", "sometimes", "source",
    "space", "special", "stage", "standard", "start", "statement", "still", "story", "strategy",
    "street", "strong", "structure", "student", "study", "style", "subject", "success", "summer",
    "support", "surface", "system", "table", "theater", "technology", "their", "theory", "thing",
    "thought", "through", "today", "together", "toward", "travel", "truth", "under", "until",
    "value", "various", "video", "visit", "voice", "wall", "watch", "water", "weight", "western",
    "whatever", "whether", "while", "window", "within", "without", "wonder", "world", "worry",
    "write", "writer", "young", "yourself",
];

const CATCH_PHRASE_LEADS: &[&str] = &[
    "Adaptive", "Automated", "Centralized", "Cloned", "Configurable", "Cross-platform",
    "Customizable", "Decentralized", "Distributed", "Enhanced", "Ergonomic", "Extended",
    "Fully-configurable", "Horizontal", "Innovative", "Integrated", "Managed", "Multi-layered",
    "Open-source", "Optimized", "Persistent", "Proactive", "Progressive", "Reactive",
    "Reduced", "Robust", "Seamless", "Streamlined", "Synergized", "Universal", "Versatile",
];

const CATCH_PHRASE_MIDDLES: &[&str] = &[
    "3rdgeneration", "asynchronous", "bottom-line", "client-driven", "client-server",
    "context-sensitive", "data-driven", "dynamic", "encompassing", "event-driven", "fault-tolerant",
    "full-range", "heuristic", "high-level", "incremental", "interactive", "local", "logistical",
    "mission-critical", "modular", "multi-tasking", "next generation", "non-volatile",
    "object-oriented", "real-time", "responsive", "scalable", "stateless", "systematic",
    "value-added", "zero-downtime",
];

const CATCH_PHRASE_TAILS: &[&str] = &[
    "alliance", "analyzer", "application", "architecture", "benchmark", "capability", "dashboard",
    "database", "emulation", "engine", "framework", "hub", "infrastructure", "interface",
    "knowledgebase", "middleware", "model", "moratorium", "orchestration", "paradigm",
    "pipeline", "platform", "portal", "protocol", "service-desk", "software", "solution",
    "strategy", "toolset", "workforce",
];

const TLDS: &[&str] = &["com", "net", "org", "io", "dev", "info"];

/// `ContentSource` backed by any `rand::Rng`.
pub struct RandomContent<R> {
    rng: R,
}

impl RandomContent<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomContent<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomContent<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    fn vary(&mut self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let scaled = count * self.rng.gen_range(60..=140) / 100;
        scaled.max(1)
    }

    fn word(&mut self) -> &'static str {
        WORDS.choose(&mut self.rng).copied().unwrap_or("lorem")
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl<R: Rng> ContentSource for RandomContent<R> {
    fn sentence(&mut self, word_count: usize) -> String {
        let count = self.vary(word_count);
        let words: Vec<&str> = (0..count).map(|_| self.word()).collect();
        format!("{}.", capitalize(&words.join(" ")))
    }

    fn paragraph(&mut self, sentence_count: usize) -> String {
        let count = self.vary(sentence_count);
        (0..count)
            .map(|_| self.sentence(6))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn catch_phrase(&mut self) -> String {
        let lead = self.choose(CATCH_PHRASE_LEADS);
        let middle = self.choose(CATCH_PHRASE_MIDDLES);
        let tail = self.choose(CATCH_PHRASE_TAILS);
        format!("{} {} {}", lead, middle, tail)
    }

    fn boolean(&mut self, chance_of_true: f64) -> bool {
        let p = if chance_of_true.is_nan() {
            0.0
        } else {
            chance_of_true.clamp(0.0, 1.0)
        };
        self.rng.gen_bool(p)
    }

    fn date_time_within(&mut self, lookback: Duration, now: DateTime<Utc>) -> DateTime<Utc> {
        let window = lookback.num_seconds();
        if window <= 0 {
            return now;
        }
        let back = self.rng.gen_range(0..=window);
        now - Duration::seconds(back)
    }

    fn url(&mut self) -> String {
        let scheme = if self.rng.gen_bool(0.8) { "https" } else { "http" };
        let host = if self.rng.gen_bool(0.5) { "www." } else { "" };
        let first = self.word();
        let second = self.word();
        let tld = self.choose(TLDS);
        format!("{}://{}{}{}.{}/", scheme, host, first, second, tld)
    }

    fn choose<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn source() -> RandomContent<StdRng> {
        RandomContent::with_rng(StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_sentence_is_capitalised_and_terminated() {
        let mut fake = source();
        for _ in 0..50 {
            let sentence = fake.sentence(6);
            assert!(sentence.ends_with('.'));
            assert!(sentence.chars().next().unwrap().is_uppercase());
            let words = sentence.split_whitespace().count();
            assert!((3..=8).contains(&words), "unexpected word count {}", words);
        }
    }

    #[test]
    fn test_paragraph_is_not_empty() {
        let mut fake = source();
        let paragraph = fake.paragraph(5);
        assert!(paragraph.matches('.').count() >= 3);
    }

    #[test]
    fn test_boolean_extremes() {
        let mut fake = source();
        assert!((0..100).all(|_| fake.boolean(1.0)));
        assert!((0..100).all(|_| !fake.boolean(0.0)));
        assert!((0..100).all(|_| fake.boolean(7.5)));
    }

    #[test]
    fn test_date_time_within_window() {
        let mut fake = source();
        let now = Utc::now();
        let lookback = Duration::days(365);
        for _ in 0..200 {
            let at = fake.date_time_within(lookback, now);
            assert!(at <= now);
            assert!(at >= now - lookback);
        }
    }

    #[test]
    fn test_url_is_parseable() {
        let mut fake = source();
        for _ in 0..20 {
            let link = fake.url();
            let parsed = url::Url::parse(&link).unwrap();
            assert!(matches!(parsed.scheme(), "http" | "https"));
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let mut a = source();
        let mut b = source();
        assert_eq!(a.catch_phrase(), b.catch_phrase());
        assert_eq!(a.sentence(6), b.sentence(6));
    }
}
