use crate::models::WeekState;
use crate::week::{Day, WeekKey};
use std::fmt::Write;

/// Exercise ids shown on every tracked day, with their display labels.
pub const EXERCISES: &[(&str, &str)] = &[
    ("push-ups", "Push-ups"),
    ("squats", "Squats"),
    ("plank", "Plank"),
    ("pull-ups", "Pull-ups"),
    ("cold-shower", "Cold shower"),
];

pub fn render_index(week: &WeekKey, state: &WeekState) -> String {
    INDEX_HTML
        .replace("{{WEEK}}", week.as_str())
        .replace("{{DAYS}}", &render_days(state))
}

fn render_days(state: &WeekState) -> String {
    let mut html = String::new();
    for day in Day::ALL {
        let _ = writeln!(html, r#"      <section class="day"><h2>{}</h2>"#, day.label());
        for (id, label) in EXERCISES {
            let checked = state
                .get(&day)
                .and_then(|exercises| exercises.get(*id))
                .copied()
                .unwrap_or(false);
            let _ = writeln!(
                html,
                r#"        <label class="exercise"><input type="checkbox" class="exercise-checkbox" data-day="{day}" data-exercise="{id}"{} /> {label}</label>"#,
                if checked { " checked" } else { "" },
            );
        }
        html.push_str("      </section>\n");
    }
    html
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Winter Arc</title>
  <style>
    :root {
      --bg: #0f1a24;
      --card: #172633;
      --ink: #e6eef5;
      --muted: #8aa1b4;
      --accent: #7cc4ff;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #1c3142);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: baseline;
      flex-wrap: wrap;
      gap: 12px;
    }

    h1 {
      margin: 0;
      letter-spacing: 0.08em;
    }

    #week-label {
      color: var(--muted);
    }

    .days {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      gap: 16px;
    }

    .day {
      background: var(--card);
      border-radius: 16px;
      padding: 16px;
      display: grid;
      gap: 8px;
    }

    .day h2 {
      margin: 0 0 4px;
      font-size: 1.05rem;
    }

    .exercise {
      display: flex;
      gap: 8px;
      align-items: center;
      cursor: pointer;
    }

    .export {
      justify-self: start;
      color: var(--bg);
      background: var(--accent);
      border-radius: 999px;
      padding: 10px 20px;
      text-decoration: none;
      font-weight: 600;
    }

    #status {
      min-height: 1.2em;
      color: var(--muted);
    }

    #status[data-type="error"] {
      color: #ff8a7a;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>WINTER ARC</h1>
      <span id="week-label">Week: {{WEEK}}</span>
    </header>
    <div class="days">
{{DAYS}}    </div>
    <a class="export" id="export-btn" href="/export">Export log</a>
    <p id="status"></p>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const weekLabel = document.getElementById('week-label');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const send = async (checkbox) => {
      const res = await fetch('/api/exercise', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({
          day: checkbox.dataset.day,
          exercise: checkbox.dataset.exercise,
          checked: checkbox.checked
        })
      });

      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }

      const data = await res.json();
      weekLabel.textContent = 'Week: ' + data.week;
      setStatus('Saved', 'ok');
      setTimeout(() => setStatus('', ''), 1200);
    };

    document.querySelectorAll('.exercise-checkbox').forEach((checkbox) => {
      checkbox.addEventListener('change', () => {
        send(checkbox).catch((err) => {
          checkbox.checked = !checkbox.checked;
          setStatus(err.message, 'error');
        });
      });
    });
  </script>
</body>
</html>
"#;
