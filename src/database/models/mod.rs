pub mod comment;
pub mod product;
pub mod user;

pub use comment::{Comment, CommentWithAuthor, NewComment};
pub use product::{NewProduct, Product, ProductChanges, ProductDetail};
pub use user::{User, UserProfile};
