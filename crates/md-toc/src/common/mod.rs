pub mod kana;
pub mod sjis;
