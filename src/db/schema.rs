//! Expected database schema, declared as static data.
//!
//! The registry is the single source of truth for the tables the backend
//! depends on. Entries are split into required tables (the backend refuses
//! to start without them) and optional tables (feature surfaces that may
//! not be provisioned yet). Changing the expected schema shape is a code
//! change, not runtime configuration.

/// One expected table: its physical name, whether the backend can run
/// without it, and the idempotent DDL used by explicit initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub create_sql: &'static str,
}

/// Core tables the backend cannot function without.
pub static REQUIRED_TABLES: &[TableDefinition] = &[
    TableDefinition {
        name: "users",
        description: "User accounts and profile information",
        required: true,
        create_sql: "\
CREATE TABLE IF NOT EXISTS users (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  username TEXT UNIQUE,
  email TEXT UNIQUE,
  phone TEXT UNIQUE,
  password_hash TEXT,
  full_name TEXT,
  profile_picture TEXT,
  is_active INTEGER NOT NULL DEFAULT 1,
  is_verified INTEGER NOT NULL DEFAULT 0,
  created_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
  updated_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
);
CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
CREATE INDEX IF NOT EXISTS idx_users_phone ON users(phone);
CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);",
    },
    TableDefinition {
        name: "sessions",
        description: "User sessions and authentication tokens",
        required: true,
        create_sql: "\
CREATE TABLE IF NOT EXISTS sessions (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  token TEXT UNIQUE NOT NULL,
  user_id INTEGER,
  is_logged_in INTEGER NOT NULL DEFAULT 0,
  metadata TEXT NOT NULL DEFAULT '{}',
  created_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
  expires_at INTEGER NOT NULL,
  last_activity_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
);
CREATE INDEX IF NOT EXISTS idx_sessions_token ON sessions(token);
CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);",
    },
    TableDefinition {
        name: "user_identifiers",
        description: "User identification methods (phone, email)",
        required: true,
        create_sql: "\
CREATE TABLE IF NOT EXISTS user_identifiers (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id INTEGER NOT NULL,
  identifier_type TEXT NOT NULL,
  identifier_value TEXT NOT NULL,
  is_verified INTEGER NOT NULL DEFAULT 0,
  created_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
  FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
  UNIQUE (identifier_type, identifier_value)
);",
    },
    TableDefinition {
        name: "user_groups",
        description: "User role groups (admin, therapist, client)",
        required: true,
        create_sql: "\
CREATE TABLE IF NOT EXISTS user_groups (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id INTEGER NOT NULL,
  role_id INTEGER NOT NULL,
  created_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
  FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
  FOREIGN KEY (role_id) REFERENCES roles(id) ON DELETE CASCADE,
  UNIQUE (user_id, role_id)
);",
    },
    TableDefinition {
        name: "permissions",
        description: "System permissions",
        required: true,
        create_sql: "\
CREATE TABLE IF NOT EXISTS permissions (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT UNIQUE NOT NULL,
  description TEXT,
  created_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
);",
    },
    TableDefinition {
        name: "roles",
        description: "User roles and their permissions",
        required: true,
        create_sql: "\
CREATE TABLE IF NOT EXISTS roles (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT UNIQUE NOT NULL,
  description TEXT,
  created_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
);",
    },
];

/// Tables behind non-essential features; absence degrades the deployment
/// instead of failing it.
pub static OPTIONAL_TABLES: &[TableDefinition] = &[
    TableDefinition {
        name: "messages",
        description: "Direct messages between users",
        required: false,
        create_sql: "\
CREATE TABLE IF NOT EXISTS messages (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  thread_id INTEGER NOT NULL,
  sender_id INTEGER NOT NULL,
  body TEXT NOT NULL,
  sent_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
  read_at INTEGER
);
CREATE INDEX IF NOT EXISTS idx_messages_thread_id ON messages(thread_id);",
    },
    TableDefinition {
        name: "message_threads",
        description: "Message conversation threads",
        required: false,
        create_sql: "\
CREATE TABLE IF NOT EXISTS message_threads (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  subject TEXT,
  created_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
);",
    },
    TableDefinition {
        name: "participants",
        description: "Thread participants",
        required: false,
        create_sql: "\
CREATE TABLE IF NOT EXISTS participants (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  thread_id INTEGER NOT NULL,
  user_id INTEGER NOT NULL,
  joined_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
  FOREIGN KEY (thread_id) REFERENCES message_threads(id) ON DELETE CASCADE,
  UNIQUE (thread_id, user_id)
);",
    },
    TableDefinition {
        name: "appointments",
        description: "Scheduled appointments",
        required: false,
        create_sql: "\
CREATE TABLE IF NOT EXISTS appointments (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  client_id INTEGER NOT NULL,
  counselor_id INTEGER NOT NULL,
  scheduled_at INTEGER NOT NULL,
  duration_minutes INTEGER NOT NULL DEFAULT 60,
  status TEXT NOT NULL DEFAULT 'booked',
  notes TEXT,
  created_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
);
CREATE INDEX IF NOT EXISTS idx_appointments_scheduled_at ON appointments(scheduled_at);",
    },
    TableDefinition {
        name: "courses",
        description: "Educational courses",
        required: false,
        create_sql: "\
CREATE TABLE IF NOT EXISTS courses (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  title TEXT NOT NULL,
  summary TEXT,
  is_published INTEGER NOT NULL DEFAULT 0,
  created_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
);",
    },
    TableDefinition {
        name: "enrollments",
        description: "User course enrollments",
        required: false,
        create_sql: "\
CREATE TABLE IF NOT EXISTS enrollments (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id INTEGER NOT NULL,
  course_id INTEGER NOT NULL,
  enrolled_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
  FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE,
  UNIQUE (user_id, course_id)
);",
    },
    TableDefinition {
        name: "progress",
        description: "User course progress tracking",
        required: false,
        create_sql: "\
CREATE TABLE IF NOT EXISTS progress (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  enrollment_id INTEGER NOT NULL,
  lesson_key TEXT NOT NULL,
  completed_at INTEGER,
  FOREIGN KEY (enrollment_id) REFERENCES enrollments(id) ON DELETE CASCADE,
  UNIQUE (enrollment_id, lesson_key)
);",
    },
    TableDefinition {
        name: "assessments",
        description: "Mental health assessments",
        required: false,
        create_sql: "\
CREATE TABLE IF NOT EXISTS assessments (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  slug TEXT UNIQUE NOT NULL,
  title TEXT NOT NULL,
  questions TEXT NOT NULL DEFAULT '[]',
  created_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
);",
    },
    TableDefinition {
        name: "assessment_results",
        description: "Assessment results and scores",
        required: false,
        create_sql: "\
CREATE TABLE IF NOT EXISTS assessment_results (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  assessment_id INTEGER NOT NULL,
  user_id INTEGER NOT NULL,
  score INTEGER,
  answers TEXT NOT NULL DEFAULT '{}',
  taken_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
  FOREIGN KEY (assessment_id) REFERENCES assessments(id) ON DELETE CASCADE
);",
    },
    TableDefinition {
        name: "payments",
        description: "Payment records",
        required: false,
        create_sql: "\
CREATE TABLE IF NOT EXISTS payments (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id INTEGER NOT NULL,
  amount INTEGER NOT NULL,
  currency TEXT NOT NULL DEFAULT 'IRR',
  status TEXT NOT NULL DEFAULT 'pending',
  created_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
);",
    },
    TableDefinition {
        name: "transactions",
        description: "Financial transactions",
        required: false,
        create_sql: "\
CREATE TABLE IF NOT EXISTS transactions (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  payment_id INTEGER NOT NULL,
  gateway_ref TEXT,
  amount INTEGER NOT NULL,
  recorded_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
  FOREIGN KEY (payment_id) REFERENCES payments(id) ON DELETE CASCADE
);",
    },
    TableDefinition {
        name: "pages",
        description: "CMS content pages",
        required: false,
        create_sql: "\
CREATE TABLE IF NOT EXISTS pages (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  slug TEXT UNIQUE NOT NULL,
  title TEXT NOT NULL,
  content TEXT NOT NULL,
  metadata TEXT NOT NULL DEFAULT '{}',
  created_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
  updated_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
);",
    },
    TableDefinition {
        name: "settings",
        description: "Key/value application settings",
        required: false,
        create_sql: "\
CREATE TABLE IF NOT EXISTS settings (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  key TEXT UNIQUE NOT NULL,
  value TEXT NOT NULL,
  type TEXT NOT NULL DEFAULT 'string',
  created_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
  updated_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
);",
    },
    TableDefinition {
        name: "support_tickets",
        description: "Support tickets raised by users",
        required: false,
        create_sql: "\
CREATE TABLE IF NOT EXISTS support_tickets (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id INTEGER,
  subject TEXT NOT NULL,
  message TEXT NOT NULL,
  status TEXT NOT NULL DEFAULT 'open',
  priority TEXT NOT NULL DEFAULT 'normal',
  created_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
  updated_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
);",
    },
    TableDefinition {
        name: "support_messages",
        description: "Ticket conversation messages",
        required: false,
        create_sql: "\
CREATE TABLE IF NOT EXISTS support_messages (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  ticket_id INTEGER NOT NULL,
  sender_type TEXT NOT NULL,
  message TEXT NOT NULL,
  created_at INTEGER NOT NULL DEFAULT (strftime('%s','now')),
  FOREIGN KEY (ticket_id) REFERENCES support_tickets(id) ON DELETE CASCADE
);",
    },
];

pub fn required_tables() -> &'static [TableDefinition] {
    REQUIRED_TABLES
}

pub fn optional_tables() -> &'static [TableDefinition] {
    OPTIONAL_TABLES
}

/// Every expected table, required entries first, each group in declaration
/// order. Verification and reports iterate in exactly this order.
pub fn all_tables() -> Vec<TableDefinition> {
    REQUIRED_TABLES
        .iter()
        .chain(OPTIONAL_TABLES.iter())
        .copied()
        .collect()
}

/// Look up a definition by physical table name.
pub fn find(name: &str) -> Option<TableDefinition> {
    REQUIRED_TABLES
        .iter()
        .chain(OPTIONAL_TABLES.iter())
        .find(|t| t.name == name)
        .copied()
}
