pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const SEARCH: &str = "🔍";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const DATABASE: &str = "🗄️";
    pub const FILE: &str = "📄";
    pub const NEW: &str = "✨";
    pub const DEL: &str = "🗑️";
    pub const CLOCK: &str = "⏱️";
    pub const HOURGLASS: &str = "⏳";
    pub const WRENCH: &str = "🔧";
}
