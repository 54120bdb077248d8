//! Scripted reply used when no token is configured
//!
//! Exercises the streaming and rendering path without a live dependency.

use super::{Chunk, ChunkStream, ResponseSource, StreamError};
use crate::conversation::Message;
use futures::StreamExt;
use std::time::Duration;

pub const SIMULATED_RESPONSE: &str = r#"# AI Response

This is a simulated response since no Hugging Face token was provided. In a real implementation, this would be the response from the Hugging Face model.

## Features

- **Markdown support** for better formatting
- Support for *italic* and **bold** text
- Code blocks with syntax highlighting

### Code Example

```javascript
const greeting = (name) => {
  return "Hello, " + name + "!";
};

console.log(greeting('User'));
```

> This is a blockquote that can be used for important information or quotes.

### Table Example

| Feature | Description |
| ------- | ----------- |
| Markdown | Formats text with headings, lists, etc. |
| Code Highlighting | Shows code with proper syntax colors |
| Tables | Organizes data in rows and columns |

You can also include [links](https://example.com) and organize information with different heading levels."#;

/// Reveals a fixed document one character per `interval`
pub struct ScriptedSource {
    script: &'static str,
    interval: Duration,
}

impl ScriptedSource {
    pub fn new(interval: Duration) -> Self {
        Self::with_script(SIMULATED_RESPONSE, interval)
    }

    pub fn with_script(script: &'static str, interval: Duration) -> Self {
        Self { script, interval }
    }
}

impl ResponseSource for ScriptedSource {
    fn open(&self, _history: &[Message]) -> Result<ChunkStream, StreamError> {
        let interval = self.interval;
        let stream = futures::stream::iter(self.script.chars()).then(move |c| async move {
            tokio::time::sleep(interval).await;
            Ok::<_, StreamError>(Chunk::text(c))
        });
        Ok(stream.boxed())
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
