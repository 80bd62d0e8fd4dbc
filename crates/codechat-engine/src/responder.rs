//! Responder collaborator: produces a reply for a user utterance.
//!
//! The conversation controller only depends on the [`Responder`] trait.
//! [`CannedResponder`] is the default implementation: a keyword lookup over a
//! few static answers, delayed to simulate network latency.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use crate::config::Config;

/// Failure of a responder call.
///
/// Always recovered by the controller; never surfaces to the caller of submit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseFailure {
    /// The responder could not produce an answer.
    #[error("Responder unavailable: {0}")]
    Unavailable(String),

    /// The task running the responder was aborted or panicked.
    #[error("Responder task aborted")]
    Aborted,
}

/// Produces a reply for a single utterance.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Answer `utterance`. Must eventually settle with a reply or a failure.
    async fn respond(&self, utterance: &str) -> Result<String, ResponseFailure>;
}

/// Keyword-matching responder with a simulated delay.
#[derive(Debug, Clone)]
pub struct CannedResponder {
    latency_min: Duration,
    latency_max: Duration,
}

impl CannedResponder {
    /// Create a responder whose delay is drawn uniformly from `min..=max`.
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            latency_min: min.min(max),
            latency_max: max.max(min),
        }
    }

    /// Create a responder that answers immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Create a responder using the latency bounds from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_millis(config.latency_min_ms),
            Duration::from_millis(config.latency_max_ms),
        )
    }

    fn delay(&self) -> Duration {
        if self.latency_max <= self.latency_min {
            return self.latency_min;
        }
        rand::thread_rng().gen_range(self.latency_min..=self.latency_max)
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[async_trait]
impl Responder for CannedResponder {
    async fn respond(&self, utterance: &str) -> Result<String, ResponseFailure> {
        let delay = self.delay();
        debug!(delay_ms = delay.as_millis(), "simulating responder latency");
        tokio::time::sleep(delay).await;
        Ok(canned_reply(utterance))
    }
}

/// A keyword rule: any of `keywords` selects `reply`.
struct Rule {
    keywords: &'static [&'static str],
    reply: &'static str,
}

/// Rules are checked in order; the first match wins.
const RULES: &[Rule] = &[
    Rule {
        keywords: &["react", "jsx"],
        reply: REACT_REPLY,
    },
    Rule {
        keywords: &["python", "algorithm"],
        reply: PYTHON_REPLY,
    },
    Rule {
        keywords: &["javascript", "js"],
        reply: JAVASCRIPT_REPLY,
    },
    Rule {
        keywords: &["debug", "error"],
        reply: DEBUGGING_REPLY,
    },
];

/// Pick the canned reply for `utterance`.
pub fn canned_reply(utterance: &str) -> String {
    let lower = utterance.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lower.contains(kw)))
        .map_or_else(|| fallback_reply(utterance), |rule| rule.reply.to_string())
}

fn fallback_reply(utterance: &str) -> String {
    format!(
        r#"I understand you're asking about: "{utterance}"

I'm a coding assistant that can help with:
• Programming languages (JavaScript, Python, React, etc.)
• Algorithms and data structures
• Debugging and troubleshooting
• Code reviews and best practices
• Architecture and design patterns

Could you provide more specific details about what you'd like help with? For example:
- What programming language?
- What's the specific problem you're trying to solve?
- Are you getting any error messages?

Feel free to share code snippets and I'll help you improve them!"#
    )
}

const REACT_REPLY: &str = r"Here's a React example:

```jsx
import React, { useState } from 'react';

function MyComponent() {
    const [count, setCount] = useState(0);

    return (
    <div>
        <p>Count: {count}</p>
        <button onClick={() => setCount(count + 1)}>
        Increment
        </button>
    </div>
    );
}
```

This demonstrates basic React hooks and state management. The `useState` hook allows you to add state to functional components.";

const PYTHON_REPLY: &str = r#"Here's a Python algorithm example:

```python
def binary_search(arr, target):
    left, right = 0, len(arr) - 1

    while left <= right:
        mid = (left + right) // 2

        if arr[mid] == target:
            return mid
        elif arr[mid] < target:
            left = mid + 1
        else:
            right = mid - 1

    return -1

# Usage
numbers = [1, 3, 5, 7, 9, 11, 13]
index = binary_search(numbers, 7)
print(f"Found at index: {index}")
```

This binary search algorithm has O(log n) time complexity and efficiently finds elements in sorted arrays."#;

const JAVASCRIPT_REPLY: &str = r"Here's a useful JavaScript pattern:

```javascript
// Async/await with error handling
async function fetchUserData(userId) {
    try {
    const response = await fetch(`/api/users/${userId}`);

    if (!response.ok) {
        throw new Error(`HTTP error! status: ${response.status}`);
    }

    const userData = await response.json();
    return userData;
    } catch (error) {
    console.error('Error fetching user data:', error);
    throw error;
    }
}

// Usage with proper error handling
fetchUserData(123)
.then(user => console.log(user))
.catch(err => console.error('Failed to load user:', err));
```

This shows modern JavaScript async patterns with proper error handling.";

const DEBUGGING_REPLY: &str = r"Here are some debugging strategies:

**1. Console Logging:**
```javascript
console.log('Variable value:', myVar);
console.table(arrayData); // For arrays/objects
console.trace(); // Shows call stack
```

**2. Browser DevTools:**
- Set breakpoints in Sources tab
- Use Network tab for API issues
- Check Console for errors

**3. Common Error Patterns:**
- Null/undefined reference errors
- Async timing issues
- Scope problems with closures
- Type mismatches

**4. Debugging Steps:**
1. Reproduce the issue consistently
2. Isolate the problem area
3. Add logging/breakpoints
4. Test assumptions step by step

What specific error are you encountering?";
