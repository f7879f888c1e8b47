/// Closed set of category icons. Names follow the icon font names, so
/// stored values such as `ShoppingCart` parse as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Icon {
    Wallet,
    ShoppingCart,
    Home,
    Car,
    Bus,
    Utensils,
    Coffee,
    Heart,
    Book,
    Gift,
    Smartphone,
    Wifi,
    Zap,
    Film,
    Briefcase,
    PiggyBank,
    TrendingUp,
    Shirt,
    Plane,
    #[default]
    Circle,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wallet => "Wallet",
            Self::ShoppingCart => "ShoppingCart",
            Self::Home => "Home",
            Self::Car => "Car",
            Self::Bus => "Bus",
            Self::Utensils => "Utensils",
            Self::Coffee => "Coffee",
            Self::Heart => "Heart",
            Self::Book => "Book",
            Self::Gift => "Gift",
            Self::Smartphone => "Smartphone",
            Self::Wifi => "Wifi",
            Self::Zap => "Zap",
            Self::Film => "Film",
            Self::Briefcase => "Briefcase",
            Self::PiggyBank => "PiggyBank",
            Self::TrendingUp => "TrendingUp",
            Self::Shirt => "Shirt",
            Self::Plane => "Plane",
            Self::Circle => "Circle",
        }
    }

    /// Accepts `ShoppingCart`, `shopping-cart`, `shopping_cart` and
    /// `shopping cart`, plus the short names `cart` and `phone`. Returns
    /// `None` for anything outside the set.
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "cart" => return Some(Self::ShoppingCart),
            "phone" => return Some(Self::Smartphone),
            _ => {}
        }
        Self::all()
            .iter()
            .copied()
            .find(|icon| icon.as_str().to_lowercase() == key)
    }

    /// Single-cell glyph for terminal rendering.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Wallet => "$",
            Self::ShoppingCart => "🛒",
            Self::Home => "⌂",
            Self::Car => "🚗",
            Self::Bus => "🚌",
            Self::Utensils => "🍴",
            Self::Coffee => "☕",
            Self::Heart => "♥",
            Self::Book => "📖",
            Self::Gift => "🎁",
            Self::Smartphone => "📱",
            Self::Wifi => "📶",
            Self::Zap => "⚡",
            Self::Film => "🎬",
            Self::Briefcase => "💼",
            Self::PiggyBank => "🐷",
            Self::TrendingUp => "↗",
            Self::Shirt => "👕",
            Self::Plane => "✈",
            Self::Circle => "●",
        }
    }

    pub fn all() -> &'static [Icon] {
        &[
            Self::Wallet,
            Self::ShoppingCart,
            Self::Home,
            Self::Car,
            Self::Bus,
            Self::Utensils,
            Self::Coffee,
            Self::Heart,
            Self::Book,
            Self::Gift,
            Self::Smartphone,
            Self::Wifi,
            Self::Zap,
            Self::Film,
            Self::Briefcase,
            Self::PiggyBank,
            Self::TrendingUp,
            Self::Shirt,
            Self::Plane,
            Self::Circle,
        ]
    }
}

impl std::fmt::Display for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
