// Color palette
pub const BACKGROUND: &str = "#0a0f1a";
pub const SURFACE: &str = "#111827";
pub const BORDER: &str = "#1f2937";
pub const TEXT: &str = "#e6eef8";
pub const MUTED: &str = "#9ca3af";
pub const ACCENT: &str = "#10b981";
pub const INFO: &str = "#3b82f6";
pub const ERROR: &str = "#ef4444";

pub const GO_COLOR: &str = "#00ADD8";
pub const JS_COLOR: &str = "#F7DF1E";

/// Stylesheet embedded in every generated document
pub const STYLESHEET: &str = r#"
:root {
  --bg: #0a0f1a;
  --surface: #111827;
  --border: #1f2937;
  --text: #e6eef8;
  --muted: #9ca3af;
  --accent: #10b981;
  --info: #3b82f6;
  --error: #ef4444;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.container { max-width: 1200px; margin: 0 auto; padding: 24px; }
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px 20px;
  margin-bottom: 16px;
}
.card h3, .card h4 { margin-bottom: 12px; }
.muted { color: var(--muted); }
.hint { color: var(--muted); font-size: 12px; margin-top: 8px; }
.hint code {
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 4px;
  padding: 1px 6px;
}

.profile-header {
  display: flex;
  align-items: center;
  justify-content: space-between;
}
.profile-header strong { font-size: 20px; }

.profile-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
  gap: 16px;
}

.stats { display: flex; gap: 12px; flex-wrap: wrap; }
.stat { flex: 1; min-width: 120px; }
.stat-value { font-size: 22px; font-weight: 600; }
.stat-label { color: var(--muted); font-size: 12px; }

.grades-container { display: grid; grid-template-columns: 1fr 1fr; gap: 12px; }
.grade-item { padding: 10px; border-radius: var(--radius); background: var(--bg); }
.grade-item.highlight { border: 1px solid var(--accent); }
.grade-value { font-size: 20px; font-weight: 600; }
.grade-label { color: var(--muted); font-size: 12px; }

.audit-stats { display: flex; gap: 20px; align-items: center; }
.audit-ratio-value { font-size: 32px; font-weight: 700; }
.audit-detail-item { display: flex; gap: 8px; align-items: center; margin-bottom: 8px; }
.audit-detail-icon {
  width: 24px; height: 24px; border-radius: 50%;
  display: flex; align-items: center; justify-content: center;
}

.activity-item { display: flex; gap: 10px; padding: 6px 0; border-bottom: 1px solid var(--border); }
.activity-item:last-child { border-bottom: none; }
.activity-dot { width: 8px; height: 8px; border-radius: 50%; background: var(--accent); margin-top: 6px; }
.activity-meta { display: flex; gap: 12px; color: var(--muted); font-size: 12px; }
.activity-amount { color: var(--accent); }

.piscine-item { margin-bottom: 12px; }
.piscine-header { display: flex; justify-content: space-between; }
.piscine-progress { height: 6px; background: var(--bg); border-radius: 3px; margin: 6px 0; }
.piscine-bar { height: 100%; border-radius: 3px; }
.piscine-details { color: var(--muted); font-size: 12px; }

.skills-list li { display: flex; justify-content: space-between; list-style: none; padding: 4px 0; }

.chart { overflow-x: auto; }
.chart-svg { background: var(--bg); border-radius: var(--radius); max-width: 100%; height: auto; }
.xp-point { cursor: pointer; }
.xp-point:hover { r: 5; }
.bar { cursor: pointer; }
.bar:hover rect { opacity: 0.8; }
.bar:hover rect.bar-track { opacity: 1; }

.error h3 { color: var(--error); }
"#;
