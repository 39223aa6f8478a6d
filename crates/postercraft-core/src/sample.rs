//! Built-in sample poster.

/// A 720x720 "Summer Sale" poster: a headline, a subtitle and a hero image
/// in the bottom-right corner. Layout is carried by inline styles so it
/// survives sanitization.
pub const SAMPLE_POSTER: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8" />
<title>Sample Poster</title>
</head>
<body>
<div class="poster" style="position: relative; width: 720px; height: 720px; background: #f3f4f6; overflow: hidden; font-family: sans-serif;">
  <h1 class="title" style="position: absolute; left: 40px; top: 80px; margin: 0; font-size: 48px; font-weight: bold; color: #111827;">Summer Sale</h1>
  <p class="subtitle" style="position: absolute; left: 40px; top: 160px; margin: 0; font-size: 20px; color: #374151;">Up to <strong>50% off</strong> on select items!</p>
  <img class="hero" src="https://images.unsplash.com/photo-1520975922284-7bcd4290b0e1?q=80&amp;w=1200&amp;auto=format&amp;fit=crop" alt="Model" style="position: absolute; left: 340px; top: 340px; width: 380px; height: 380px; object-fit: cover; border-top-left-radius: 16px;" />
</div>
</body>
</html>"#;
