// Two tiers:
// - public: readable by anyone (/, /health, product listing and detail)
// - protected: needs a resolved caller (own products, comments, profile)
pub mod protected;
pub mod public;
